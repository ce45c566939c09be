use std::path::Path;
use std::process::Command;

/// Runs `command` through `sh -c` in `cwd`, appending `args` shell-escaped.
pub fn run_shell(command: &str, cwd: &Path, label: &str, args: &[String]) -> Result<(), String> {
    let full_command = if args.is_empty() {
        command.to_string()
    } else {
        format!("{} {}", command, shell_join(args))
    };
    println!(
        "[edgegen] executing `{}` ({}) in {}",
        full_command,
        label,
        cwd.display()
    );

    let status = Command::new("sh")
        .arg("-c")
        .arg(&full_command)
        .current_dir(cwd)
        .status()
        .map_err(|err| format!("failed to run {} command `{}`: {}", label, full_command, err))?;

    if status.success() {
        Ok(())
    } else {
        Err(format!(
            "{} command `{}` exited with status {}",
            label, full_command, status
        ))
    }
}

pub fn shell_join(args: &[String]) -> String {
    args.iter()
        .map(|arg| shell_escape(arg.as_str()))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn shell_escape(arg: &str) -> String {
    if arg.is_empty() {
        "''".to_string()
    } else if arg
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || "._-/:=@".contains(c))
    {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', "'\"'\"'"))
    }
}
