//! Cleanup applied to free-text card fields before they become CSV cells.

/// Commas become spaces, double quotes and newlines are dropped.
pub fn clean_agent_name(raw: &str) -> String {
    raw.replace(',', " ").replace('"', "").replace('\n', "")
}

/// Commas become spaces and double quotes are dropped. Newlines are kept.
pub fn clean_business_name(raw: &str) -> String {
    raw.replace(',', " ").replace('"', "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_name_strips_commas_quotes_and_newlines() {
        assert_eq!(clean_agent_name("Jane, \"Doe\"\n"), "Jane  Doe");
        assert_eq!(clean_agent_name("Smith,John"), "Smith John");
    }

    #[test]
    fn test_business_name_keeps_newlines() {
        assert_eq!(
            clean_business_name("Keller Williams, \"Realty\"\nAustin"),
            "Keller Williams  Realty\nAustin"
        );
    }

    #[test]
    fn test_plain_values_pass_through() {
        assert_eq!(clean_agent_name("Maria Lopez"), "Maria Lopez");
        assert_eq!(clean_business_name("Compass"), "Compass");
        assert_eq!(clean_business_name(""), "");
    }
}
