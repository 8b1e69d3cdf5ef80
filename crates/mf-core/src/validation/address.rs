//! Postcode lookup result handling.

use serde::{Deserialize, Serialize};

use super::ValidationOutcome;

/// Fields returned by the postcode lookup widget for one selection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AddressData {
    pub road_address: String,
    pub address: String,
    /// `"R"` for road addresses, `"J"` for lot-number addresses.
    pub address_type: String,
    pub bname: String,
    pub building_name: String,
}

/// Builds the address string stored in the form.
///
/// With `use_road_address` and a non-empty road address, that is returned
/// as is. Otherwise the lot-number address is used, suffixed with
/// `(bname, buildingName)` when the lookup type is road and either
/// descriptor is present.
pub fn process_address_data(data: &AddressData, use_road_address: bool) -> String {
    if use_road_address && !data.road_address.is_empty() {
        return data.road_address.clone();
    }

    let mut full_address = data.address.clone();
    if data.address_type == "R" {
        let extras: Vec<&str> = [data.bname.as_str(), data.building_name.as_str()]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        if !extras.is_empty() {
            full_address.push_str(&format!(" ({})", extras.join(", ")));
        }
    }
    full_address
}

pub fn validate_address(address: &str) -> ValidationOutcome {
    if address.trim().is_empty() {
        return ValidationOutcome::invalid("주소를 입력해주세요");
    }
    ValidationOutcome::valid("")
}
