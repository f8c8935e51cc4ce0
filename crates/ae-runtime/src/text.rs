use ae_core::VariableStore;
use regex::Regex;

/// Substitutes `${NAME}` references in prompt/response text with the current
/// store value. Unknown variables render as the store default (empty).
pub fn render_text(template: &str, vars: &VariableStore) -> String {
    let regex = Regex::new(r"\$\{([^{}]+)\}").expect("template regex must compile");
    let mut output = String::new();
    let mut last_index = 0usize;
    for captures in regex.captures_iter(template) {
        let full = captures
            .get(0)
            .expect("capture group 0 must exist for each regex capture");
        let name = captures
            .get(1)
            .expect("capture group 1 must exist for each regex capture");
        output.push_str(&template[last_index..full.start()]);
        output.push_str(&vars.text(name.as_str()));
        last_index = full.end();
    }
    output.push_str(&template[last_index..]);
    output
}
