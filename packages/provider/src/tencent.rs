//! Tencent location service adapter.
//!
//! - Geocode: `GET /ws/geocoder/v1/`
//! - IP location: `GET /ws/location/v1/ip`
//! - Radius search: `GET /ws/place/v1/search` with `boundary=nearby(...)`
//! - Region search: `GET /ws/place/v1/search` with `boundary=region(...)`
//!
//! Tencent's place search carries no rating or price, so its records
//! rank below rated duplicates from other providers during merging.
//!
//! See <https://lbs.qq.com/service/webService/webServiceGuide/webServiceOverview>

use std::time::Duration;

use food_map_poi_models::{CanonicalPoi, Coordinates, ProviderId};
use serde_json::Value;

use crate::normalize::{
    PoiNormalizer, extract_cuisine_type, parse_integer, parse_lat_lng_object, split_tags,
    text_field,
};
use crate::{Capability, PoiProvider, ProviderError, RadiusQuery, RegionQuery, http};

const PROVIDER: ProviderId = ProviderId::Tencent;

/// Tencent location service client.
pub struct TencentProvider {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) region_search: bool,
    pub(crate) ip_locate: bool,
    pub(crate) default_category: String,
    pub(crate) page_size: u32,
}

impl TencentProvider {
    async fn get(&self, path: &str, params: Vec<(&str, String)>) -> Result<Value, ProviderError> {
        let mut params = params;
        params.push(("key", self.api_key.clone()));

        let url = format!("{}{path}", self.base_url);
        let body = http::get_json(&self.client, PROVIDER, &url, &params, self.timeout).await?;
        check_status(&body)?;
        Ok(body)
    }

    fn search_params<'a>(&self, keyword: &str, boundary: String) -> Vec<(&'a str, String)> {
        vec![
            ("keyword", keyword.to_string()),
            ("boundary", boundary),
            ("filter", format!("category={}", self.default_category)),
            ("page_size", self.page_size.to_string()),
            ("page_index", "1".to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl PoiProvider for TencentProvider {
    fn id(&self) -> ProviderId {
        PROVIDER
    }

    fn supports_ip_locate(&self) -> bool {
        self.ip_locate
    }

    fn supports_region_search(&self) -> bool {
        self.region_search
    }

    async fn geocode(&self, address: &str) -> Result<Coordinates, ProviderError> {
        let body = self
            .get("/ws/geocoder/v1/", vec![("address", address.to_string())])
            .await?;
        parse_location(&body).ok_or_else(|| ProviderError::NoResults {
            provider: PROVIDER,
            query: address.to_string(),
        })
    }

    async fn ip_locate(&self) -> Result<Coordinates, ProviderError> {
        if !self.ip_locate {
            return Err(ProviderError::Unsupported {
                provider: PROVIDER,
                capability: Capability::IpLocate,
            });
        }
        let body = self.get("/ws/location/v1/ip", Vec::new()).await?;
        parse_location(&body).ok_or_else(|| ProviderError::NoResults {
            provider: PROVIDER,
            query: "IP location".to_string(),
        })
    }

    async fn search_by_radius(
        &self,
        query: &RadiusQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError> {
        if let Some(code) = query.poi_type_code {
            log::debug!("{PROVIDER}: ignoring POI type code {code}, using category filter");
        }
        let center = query.center;
        let boundary = format!(
            "nearby({:.6},{:.6},{},0)",
            center.lat, center.lng, query.radius_meters
        );
        let body = self
            .get("/ws/place/v1/search", self.search_params(query.keyword, boundary))
            .await?;

        Ok(TencentNormalizer.normalize_all(data_array(&body)?, Some(center)))
    }

    async fn search_by_region_text(
        &self,
        query: &RegionQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError> {
        if !self.region_search {
            return Err(ProviderError::Unsupported {
                provider: PROVIDER,
                capability: Capability::RegionSearch,
            });
        }
        let auto_extend = u8::from(!query.city_limit);
        let boundary = format!("region({},{auto_extend})", query.region);
        let body = self
            .get("/ws/place/v1/search", self.search_params(query.keyword, boundary))
            .await?;

        Ok(TencentNormalizer.normalize_all(data_array(&body)?, None))
    }
}

/// Maps a non-zero status to [`ProviderError::Status`].
fn check_status(body: &Value) -> Result<(), ProviderError> {
    if parse_integer(body.get("status")) == Some(0) {
        return Ok(());
    }
    Err(ProviderError::Status {
        provider: PROVIDER,
        code: text_field(body.get("status")),
        message: text_field(body.get("message")),
    })
}

fn parse_location(body: &Value) -> Option<Coordinates> {
    parse_lat_lng_object(body.pointer("/result/location"))
}

fn data_array(body: &Value) -> Result<&[Value], ProviderError> {
    match body.get("data") {
        Some(Value::Array(data)) => Ok(data.as_slice()),
        None | Some(Value::Null) => Ok(&[]),
        Some(_) => Err(ProviderError::Parse {
            provider: PROVIDER,
            message: "'data' is not an array".to_string(),
        }),
    }
}

/// Normalizer for Tencent place objects.
pub struct TencentNormalizer;

impl PoiNormalizer for TencentNormalizer {
    fn provider(&self) -> ProviderId {
        PROVIDER
    }

    fn normalize(&self, raw: &Value) -> Option<CanonicalPoi> {
        let name = text_field(raw.get("title"));
        if name.is_empty() {
            return None;
        }
        let location = parse_lat_lng_object(raw.get("location"))?;
        let native_id = text_field(raw.get("id"));
        let category = text_field(raw.get("category"));

        let mut poi = CanonicalPoi::new(PROVIDER, &native_id, name, location);
        poi.address = text_field(raw.get("address"));
        poi.phone = text_field(raw.get("tel"));
        poi.cuisine_type = extract_cuisine_type(&category);
        poi.tags = split_tags([category.as_str()]);

        Some(poi)
    }
}
