//! Amadeus Self-Service API client.
//!
//! This module provides an HTTP client for the Amadeus flight-offers
//! search, the only source of price data.
//!
//! Key characteristics of Amadeus:
//! - Every call needs a bearer token from an OAuth2 client-credentials
//!   exchange; tokens live for about 30 minutes
//! - Prices are decimal strings (`price.grandTotal`)
//! - The test environment is heavily rate limited

mod backend;
mod client;
mod error;
mod mock;
mod token;
mod types;

pub use backend::AmadeusBackend;
pub use client::{AmadeusClient, AmadeusConfig};
pub use error::AmadeusError;
pub use mock::MockAmadeusClient;
pub use token::{
    ClientCredentials, Clock, IssuedToken, OAuthIssuer, SystemClock, Token, TokenCache,
    TokenIssuer,
};
pub use types::{FlightOfferDto, FlightOffersResponse, OfferPriceDto, TokenResponse};
