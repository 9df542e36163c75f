//! `projson framework`: how framework tokens resolve.

use projson_frameworks::Framework;
use projson_model::make_framework_define;

/// Describe each token. Returns `false` if any token is unsupported.
pub fn run(tokens: &[String]) -> bool {
    let mut all_supported = true;
    for token in tokens {
        let framework = Framework::parse(token);
        all_supported &= !framework.is_unsupported();
        println!("{}", describe(token, &framework));
    }
    all_supported
}

fn describe(token: &str, framework: &Framework) -> String {
    if framework.is_unsupported() {
        return format!("{token}: unsupported");
    }
    let define = make_framework_define(framework).unwrap_or_else(|| "(none)".to_string());
    let kind = if framework.is_pcl() { "portable" } else { "specific" };
    format!(
        "{token}:\n  full name:   {framework}\n  folder:      {}\n  define:      {define}\n  kind:        {kind}",
        framework.short_folder_name()
    )
}
