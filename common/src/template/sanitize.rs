/// Replace any unwanted character in resource name
/// with its uppercase-alpha counterpart
pub fn escape_resource_name(name: &str) -> String {
    name.replace("@", "AT")
        .replace(".", "DOT")
        .replace("-", "HYPHEN")
        .replace("_", "UNDRSC")
        .replace("/", "SLASH")
}

#[cfg(test)]
mod tests {
    use super::escape_resource_name;

    #[test]
    fn escapes_path_like_names() {
        assert_eq!(
            escape_resource_name("/config/spring.message"),
            "SLASHconfigSLASHspringDOTmessage"
        );
    }

    #[test]
    fn alphanumeric_name_is_unchanged() {
        assert_eq!(escape_resource_name("SnsQueue1"), "SnsQueue1");
    }
}
