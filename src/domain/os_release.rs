/// Location of the os-release file on the inspected host.
pub const OS_RELEASE_PATH: &str = "/etc/os-release";

/// Returns the `ID` field of an os-release document, which names the
/// operating system (`ubuntu`, `debian`, `rhel`, ...).
pub fn parse_os_name(content: &str) -> Option<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.starts_with('#'))
        .filter_map(|line| line.split_once('='))
        .find(|(key, _)| key.trim() == "ID")
        .map(|(_, value)| unquote(value.trim()).to_string())
        .filter(|value| !value.is_empty())
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = value
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    value
}
