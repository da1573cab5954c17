use tracing::debug;

use crate::browser::PageElement;
use crate::config::SelectorConfig;
use crate::error::Result;
use crate::parser::{clean_agent_name, clean_business_name};
use crate::storage::AgentRecord;

/// Pulls an `AgentRecord` out of one agent card.
pub struct AgentExtractor {
    selectors: SelectorConfig,
}

impl AgentExtractor {
    pub fn new(selectors: SelectorConfig) -> Self {
        Self { selectors }
    }

    /// Up to two phone numbers in document order, padded with empty strings.
    pub async fn extract_phone_numbers(&self, card: &dyn PageElement) -> Result<[String; 2]> {
        let phone_elements = card.find_elements(&self.selectors.phone).await?;

        let mut phone_numbers = Vec::with_capacity(phone_elements.len());
        for phone_element in &phone_elements {
            let mut phone_number = phone_element.text().await?;
            if phone_number.is_empty() {
                // text only present in the rendered DOM
                phone_number = phone_element.inner_text().await?;
            }
            if !phone_number.is_empty() {
                phone_numbers.push(phone_number);
            }
        }

        Ok(fill_phone_slots(phone_numbers))
    }

    /// Name, business name or link missing is an error; missing phones are not.
    pub async fn extract_agent(&self, card: &dyn PageElement) -> Result<AgentRecord> {
        let name = card.find_element(&self.selectors.name).await?.text().await?;
        let business_name = card
            .find_element(&self.selectors.business_name)
            .await?
            .text()
            .await?;
        let [phone_primary, phone_secondary] = self.extract_phone_numbers(card).await?;
        let profile_link = card
            .find_element(&self.selectors.profile_link)
            .await?
            .attribute("href")
            .await?
            .unwrap_or_default();

        let record = AgentRecord {
            name: clean_agent_name(&name),
            business_name: clean_business_name(&business_name),
            phone_primary,
            phone_secondary,
            profile_link,
        };
        debug!("Extracted agent {:?}", record.name);
        Ok(record)
    }
}

/// Keeps the first two numbers and pads the rest with empty strings.
pub fn fill_phone_slots(phone_numbers: Vec<String>) -> [String; 2] {
    let mut numbers = phone_numbers.into_iter();
    [
        numbers.next().unwrap_or_default(),
        numbers.next().unwrap_or_default(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::session::MockPageElement;
    use crate::error::ScrapingError;

    const LINK: &str = r#"[aria-label="link name"]"#;

    fn phone(visible: &str, rendered: &str) -> Box<dyn PageElement> {
        let visible = visible.to_string();
        let rendered = rendered.to_string();
        let mut element = MockPageElement::new();
        element.expect_text().returning(move || Ok(visible.clone()));
        element.expect_inner_text().returning(move || Ok(rendered.clone()));
        Box::new(element)
    }

    fn text_element(text: &str) -> Box<dyn PageElement> {
        let text = text.to_string();
        let mut element = MockPageElement::new();
        element.expect_text().returning(move || Ok(text.clone()));
        Box::new(element)
    }

    fn link_element(href: Option<&str>) -> Box<dyn PageElement> {
        let href = href.map(str::to_string);
        let mut element = MockPageElement::new();
        element
            .expect_attribute()
            .returning(move |name| Ok(if name == "href" { href.clone() } else { None }));
        Box::new(element)
    }

    fn card_with_phones(phones: Vec<(&'static str, &'static str)>) -> MockPageElement {
        let mut card = MockPageElement::new();
        card.expect_find_elements().returning(move |selector| {
            assert_eq!(selector, ".agent-phone");
            Ok(phones.iter().map(|(visible, rendered)| phone(visible, rendered)).collect())
        });
        card
    }

    fn extractor() -> AgentExtractor {
        AgentExtractor::new(SelectorConfig::default())
    }

    #[test]
    fn test_fill_phone_slots_pads_and_truncates() {
        let owned = |v: &[&str]| v.iter().map(|s| s.to_string()).collect::<Vec<_>>();

        assert_eq!(fill_phone_slots(vec![]), [String::new(), String::new()]);
        assert_eq!(fill_phone_slots(owned(&["1"])), ["1".to_string(), String::new()]);
        assert_eq!(fill_phone_slots(owned(&["1", "2"])), ["1".to_string(), "2".to_string()]);
        assert_eq!(fill_phone_slots(owned(&["1", "2", "3"])), ["1".to_string(), "2".to_string()]);
    }

    #[tokio::test]
    async fn test_no_phone_elements_gives_two_empty_slots() {
        let card = card_with_phones(vec![]);
        let phones = extractor().extract_phone_numbers(&card).await.unwrap();
        assert_eq!(phones, [String::new(), String::new()]);
    }

    #[tokio::test]
    async fn test_empty_visible_text_falls_back_to_inner_text() {
        let card = card_with_phones(vec![("", "(512) 555-0199"), ("(512) 555-0100", "")]);
        let phones = extractor().extract_phone_numbers(&card).await.unwrap();
        assert_eq!(phones, ["(512) 555-0199".to_string(), "(512) 555-0100".to_string()]);
    }

    #[tokio::test]
    async fn test_visible_text_skips_script_fallback() {
        let mut element = MockPageElement::new();
        element.expect_text().returning(|| Ok("(737) 555-0111".to_string()));
        element.expect_inner_text().never();
        let elements: Vec<Box<dyn PageElement>> = vec![Box::new(element)];

        let mut card = MockPageElement::new();
        card.expect_find_elements()
            .times(1)
            .return_once(move |_| Ok(elements));

        let phones = extractor().extract_phone_numbers(&card).await.unwrap();
        assert_eq!(phones, ["(737) 555-0111".to_string(), String::new()]);
    }

    #[tokio::test]
    async fn test_blank_entries_are_skipped_and_extra_numbers_dropped() {
        let card = card_with_phones(vec![("", ""), ("111", ""), ("", "222"), ("333", "")]);
        let phones = extractor().extract_phone_numbers(&card).await.unwrap();
        assert_eq!(phones, ["111".to_string(), "222".to_string()]);
    }

    #[tokio::test]
    async fn test_extract_agent_sanitizes_fields() {
        let mut card = card_with_phones(vec![("(512) 555-0100", "")]);
        card.expect_find_element().returning(|selector| match selector {
            ".agent-name" => Ok(text_element("Jane, \"Doe\"\n")),
            ".agent-group" => Ok(text_element("Doe, \"Home\" Group\nAustin")),
            LINK => Ok(link_element(Some("https://example.com/realestateagents/jane-doe"))),
            other => Err(ScrapingError::element_not_found(other)),
        });

        let record = extractor().extract_agent(&card).await.unwrap();

        assert_eq!(
            record,
            AgentRecord {
                name: "Jane  Doe".to_string(),
                business_name: "Doe  Home Group\nAustin".to_string(),
                phone_primary: "(512) 555-0100".to_string(),
                phone_secondary: String::new(),
                profile_link: "https://example.com/realestateagents/jane-doe".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_link_without_href_is_empty() {
        let mut card = card_with_phones(vec![]);
        card.expect_find_element().returning(|selector| match selector {
            LINK => Ok(link_element(None)),
            _ => Ok(text_element("x")),
        });

        let record = extractor().extract_agent(&card).await.unwrap();
        assert_eq!(record.profile_link, "");
    }

    #[tokio::test]
    async fn test_missing_business_name_is_fatal() {
        let mut card = card_with_phones(vec![]);
        card.expect_find_element().returning(|selector| match selector {
            ".agent-name" => Ok(text_element("Jane Doe")),
            other => Err(ScrapingError::element_not_found(other)),
        });

        let err = extractor().extract_agent(&card).await.unwrap_err();
        assert!(matches!(err, ScrapingError::ElementNotFound { ref selector } if selector == ".agent-group"));
    }
}
