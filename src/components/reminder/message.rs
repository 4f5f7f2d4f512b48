/// Fill the `{name}` and `{time}` placeholders of a message template.
///
/// Substitution is a single pass, so placeholder text inside the event name is kept as is.
pub fn render_message(template: &str, name: &str, time: &str) -> String {
    template
        .split("{name}")
        .map(|part| part.replace("{time}", time))
        .collect::<Vec<_>>()
        .join(name)
}
