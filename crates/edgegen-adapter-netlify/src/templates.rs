use edgegen_adapter::scaffold::TemplateRegistration;

macro_rules! registration {
    ($language:literal, $name:literal) => {
        TemplateRegistration {
            language: $language,
            name: $name,
            contents: include_str!(concat!("templates/", $language, "/", $name, ".hbs")),
        }
    };
}

/// Built-in templates written by `edgegen templates`.
pub static NETLIFY_TEMPLATE_REGISTRATIONS: &[TemplateRegistration] = &[
    registration!("typescript", "handler"),
    registration!("typescript", "netlify"),
    registration!("typescript", "webpack"),
    registration!("typescript", "netlify_default"),
    registration!("javascript", "handler"),
    registration!("javascript", "netlify"),
    registration!("javascript", "webpack"),
    registration!("javascript", "netlify_default"),
];
