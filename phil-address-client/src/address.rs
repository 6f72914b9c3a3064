use serde::{Deserialize, Serialize};

/// Components of a postal address. Absent and empty parts are skipped when joined.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressParts {
    pub street: Option<String>,
    pub barangay: Option<String>,
    pub city: Option<String>,
    pub province: Option<String>,
    pub region: Option<String>,
    pub zip_code: Option<String>,
}

impl AddressParts {
    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.street = Some(street.into());
        self
    }

    pub fn barangay(mut self, barangay: impl Into<String>) -> Self {
        self.barangay = Some(barangay.into());
        self
    }

    pub fn city(mut self, city: impl Into<String>) -> Self {
        self.city = Some(city.into());
        self
    }

    pub fn province(mut self, province: impl Into<String>) -> Self {
        self.province = Some(province.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn zip_code(mut self, zip_code: impl Into<String>) -> Self {
        self.zip_code = Some(zip_code.into());
        self
    }
}

/// Joins street, barangay, city, province, region and zip code with `", "`.
pub fn construct_address(parts: &AddressParts) -> String {
    [
        &parts.street,
        &parts.barangay,
        &parts.city,
        &parts.province,
        &parts.region,
        &parts.zip_code,
    ]
    .into_iter()
    .filter_map(|part| part.as_deref())
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_address() {
        let parts = AddressParts::default()
            .barangay("Barangay 1")
            .city("Laoag City")
            .province("Ilocos Norte")
            .region("Region I");
        assert_eq!(
            construct_address(&parts),
            "Barangay 1, Laoag City, Ilocos Norte, Region I"
        );
    }

    #[test]
    fn test_street_and_zip_code_bracket_the_address() {
        let parts = AddressParts::default()
            .street("12 Rizal St.")
            .city("Laoag City")
            .zip_code("2900");
        assert_eq!(construct_address(&parts), "12 Rizal St., Laoag City, 2900");
    }

    #[test]
    fn test_partial_and_empty() {
        let parts = AddressParts::default()
            .city("Laoag City")
            .province("Ilocos Norte")
            .barangay("");
        assert_eq!(construct_address(&parts), "Laoag City, Ilocos Norte");
        assert_eq!(construct_address(&AddressParts::default()), "");
    }

    #[test]
    fn test_deserializes_from_camel_case() {
        let parts: AddressParts =
            serde_json::from_str(r#"{"city":"Laoag City","zipCode":"2900"}"#).unwrap();
        assert_eq!(construct_address(&parts), "Laoag City, 2900");
    }
}
