//! Amadeus API response DTOs.
//!
//! These types map directly to the Amadeus JSON responses. Only the fields
//! needed for pricing are modelled; everything else is ignored.

use serde::{Deserialize, Serialize};

use crate::domain::Offer;

/// Response from the OAuth2 client-credentials endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    /// The bearer token.
    pub access_token: String,

    /// Token lifetime in seconds.
    pub expires_in: u64,

    /// Usually "Bearer".
    pub token_type: Option<String>,
}

/// Response from `GET /v2/shopping/flight-offers`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FlightOffersResponse {
    /// Offers, absent when nothing matched.
    #[serde(default)]
    pub data: Vec<FlightOfferDto>,
}

/// One flight offer.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FlightOfferDto {
    /// Offer identifier within the response.
    pub id: Option<String>,

    /// Price block.
    #[serde(default)]
    pub price: OfferPriceDto,
}

/// Price block of a flight offer. Amounts are decimal strings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferPriceDto {
    pub currency: Option<String>,

    /// Total excluding some ancillary fees.
    pub total: Option<String>,

    /// Total including all fees; used for comparison.
    pub grand_total: Option<String>,
}

impl From<FlightOfferDto> for Offer {
    fn from(dto: FlightOfferDto) -> Self {
        Offer {
            grand_total: dto.price.grand_total.unwrap_or_default(),
            currency: dto.price.currency,
        }
    }
}

/// Convert a flight-offers response into provider-neutral offers.
pub fn convert_offers(response: FlightOffersResponse) -> Vec<Offer> {
    response.data.into_iter().map(Offer::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_flight_offers() {
        let json = r#"{
            "meta": {"count": 2},
            "data": [
                {"type": "flight-offer", "id": "1",
                 "price": {"currency": "EUR", "total": "95.40", "base": "60.00", "grandTotal": "95.40"}},
                {"type": "flight-offer", "id": "2",
                 "price": {"currency": "EUR", "total": "80.00", "grandTotal": "80.00"}}
            ]
        }"#;

        let response: FlightOffersResponse = serde_json::from_str(json).unwrap();
        let offers = convert_offers(response);

        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0].grand_total, "95.40");
        assert_eq!(offers[0].currency.as_deref(), Some("EUR"));
        assert_eq!(offers[1].total(), Some(80.0));
    }

    #[test]
    fn missing_data_is_empty() {
        let response: FlightOffersResponse = serde_json::from_str(r#"{"meta": {}}"#).unwrap();
        assert!(convert_offers(response).is_empty());
    }

    #[test]
    fn missing_grand_total_is_unparseable() {
        let json = r#"{"data": [{"id": "1", "price": {"currency": "EUR"}}]}"#;
        let response: FlightOffersResponse = serde_json::from_str(json).unwrap();
        let offers = convert_offers(response);
        assert_eq!(offers[0].total(), None);
    }

    #[test]
    fn parse_token_response() {
        let json = r#"{"type": "amadeusOAuth2Token", "username": "dev@example.com",
            "access_token": "abc123", "token_type": "Bearer", "expires_in": 1799, "state": "approved"}"#;
        let token: TokenResponse = serde_json::from_str(json).unwrap();
        assert_eq!(token.access_token, "abc123");
        assert_eq!(token.expires_in, 1799);
        assert_eq!(token.token_type.as_deref(), Some("Bearer"));
    }
}
