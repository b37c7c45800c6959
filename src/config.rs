use std::env;
use std::fmt::Debug;
use std::net::SocketAddr;
use std::str::FromStr;

use crate::entities::Coordinates;
use crate::error::{config_error, Error};

const DEFAULT_CENTER: Coordinates = Coordinates {
    lat: 29.3759,
    lng: 47.9774,
};

#[derive(Clone, Debug)]
pub struct Config {
    pub google_maps_api_base: String,
    pub google_maps_api_key: String,
    pub api_url: String,
    pub api_token: Option<String>,
    pub language: String,
    pub region: String,
    pub map_center: Coordinates,
    pub map_zoom: u8,
    pub focus_zoom: u8,
    pub listen_addr: SocketAddr,
}

impl Config {
    #[tracing::instrument]
    pub fn from_env() -> Result<Self, Error> {
        if let Err(err) = dotenv::dotenv() {
            tracing::debug!(?err, "no .env file loaded");
        }

        Ok(Self {
            google_maps_api_base: var_or("GOOGLE_MAPS_API_BASE", "maps.googleapis.com"),
            google_maps_api_key: env::var("GOOGLE_MAPS_API_KEY")?,
            api_url: env::var("API_URL")?.trim_end_matches('/').into(),
            api_token: env::var("API_TOKEN").ok(),
            language: var_or("MAP_LANGUAGE", "ar"),
            region: var_or("MAP_REGION", "KW"),
            map_center: Coordinates {
                lat: parse_var("MAP_CENTER_LAT", DEFAULT_CENTER.lat)?,
                lng: parse_var("MAP_CENTER_LNG", DEFAULT_CENTER.lng)?,
            },
            map_zoom: parse_var("MAP_ZOOM", 12)?,
            focus_zoom: parse_var("MAP_FOCUS_ZOOM", 15)?,
            listen_addr: var_or("LISTEN_ADDR", "127.0.0.1:3000").parse()?,
        })
    }
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.into())
}

fn parse_var<T>(name: &str, default: T) -> Result<T, Error>
where
    T: FromStr,
    T::Err: Debug,
{
    match env::var(name) {
        Ok(value) => value.parse().map_err(config_error),
        Err(_) => Ok(default),
    }
}

#[test]
fn parse_var_falls_back_and_rejects_garbage() {
    env::remove_var("DISPATCH_CONSOLE_TEST_ZOOM");
    assert_eq!(parse_var("DISPATCH_CONSOLE_TEST_ZOOM", 12u8), Ok(12));

    env::set_var("DISPATCH_CONSOLE_TEST_ZOOM", "15");
    assert_eq!(parse_var("DISPATCH_CONSOLE_TEST_ZOOM", 12u8), Ok(15));

    env::set_var("DISPATCH_CONSOLE_TEST_ZOOM", "near");
    assert_eq!(parse_var("DISPATCH_CONSOLE_TEST_ZOOM", 12u8).map_err(|err| err.code), Err(2));

    env::remove_var("DISPATCH_CONSOLE_TEST_ZOOM");
}
