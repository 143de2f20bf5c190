//! Amap (Gaode) web service adapter.
//!
//! - Geocode: `GET /v3/geocode/geo`
//! - IP location: `GET /v3/ip` (center of the returned `rectangle`)
//! - Radius search: `GET /v3/place/around`
//! - Region search: `GET /v3/place/text`
//!
//! Amap reports success as `status == "1"`, encodes locations as
//! `"lng,lat"` strings, and sends empty fields as `[]`.
//!
//! See <https://lbs.amap.com/api/webservice/summary>

use std::time::Duration;

use food_map_poi_models::{CanonicalPoi, Coordinates, ProviderId};
use serde_json::Value;

use crate::normalize::{
    PoiNormalizer, extract_cuisine_type, parse_cost, parse_lng_lat, parse_price_bucket,
    parse_rating, split_tags, text_field,
};
use crate::{PoiProvider, ProviderError, RadiusQuery, RegionQuery, http};

const PROVIDER: ProviderId = ProviderId::Amap;

/// Amap web service client.
pub struct AmapProvider {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) region_search: bool,
    pub(crate) ip_locate: bool,
    pub(crate) default_type_code: String,
    pub(crate) page_size: u32,
}

impl AmapProvider {
    async fn get(&self, path: &str, params: Vec<(&str, String)>) -> Result<Value, ProviderError> {
        let mut params = params;
        params.push(("key", self.api_key.clone()));
        params.push(("output", "JSON".to_string()));

        let url = format!("{}{path}", self.base_url);
        let body = http::get_json(&self.client, PROVIDER, &url, &params, self.timeout).await?;
        check_status(&body)?;
        Ok(body)
    }

    fn type_code<'a>(&'a self, requested: Option<&'a str>) -> &'a str {
        requested.unwrap_or(&self.default_type_code)
    }
}

#[async_trait::async_trait]
impl PoiProvider for AmapProvider {
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
            .get("/v3/geocode/geo", vec![("address", address.to_string())])
            .await?;
        parse_geocode_response(&body, address)
    }

    async fn ip_locate(&self) -> Result<Coordinates, ProviderError> {
        if !self.ip_locate {
            return Err(ProviderError::Unsupported {
                provider: PROVIDER,
                capability: crate::Capability::IpLocate,
            });
        }
        let body = self.get("/v3/ip", Vec::new()).await?;
        parse_ip_response(&body)
    }

    async fn search_by_radius(
        &self,
        query: &RadiusQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError> {
        let center = query.center;
        let body = self
            .get(
                "/v3/place/around",
                vec![
                    ("location", format!("{:.6},{:.6}", center.lng, center.lat)),
                    ("radius", query.radius_meters.to_string()),
                    ("keywords", query.keyword.to_string()),
                    ("types", self.type_code(query.poi_type_code).to_string()),
                    ("sortrule", "distance".to_string()),
                    ("offset", self.page_size.to_string()),
                    ("page", "1".to_string()),
                    ("extensions", "all".to_string()),
                ],
            )
            .await?;

        Ok(AmapNormalizer.normalize_all(pois_array(&body)?, Some(center)))
    }

    async fn search_by_region_text(
        &self,
        query: &RegionQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError> {
        if !self.region_search {
            return Err(ProviderError::Unsupported {
                provider: PROVIDER,
                capability: crate::Capability::RegionSearch,
            });
        }
        let body = self
            .get(
                "/v3/place/text",
                vec![
                    ("keywords", query.keyword.to_string()),
                    ("types", self.type_code(query.poi_type_code).to_string()),
                    ("city", query.region.to_string()),
                    ("citylimit", query.city_limit.to_string()),
                    ("offset", self.page_size.to_string()),
                    ("page", "1".to_string()),
                    ("extensions", "all".to_string()),
                ],
            )
            .await?;

        Ok(AmapNormalizer.normalize_all(pois_array(&body)?, None))
    }
}

/// Maps a non-`"1"` status to [`ProviderError::Status`].
fn check_status(body: &Value) -> Result<(), ProviderError> {
    if body.get("status").and_then(Value::as_str) == Some("1") {
        return Ok(());
    }
    Err(ProviderError::Status {
        provider: PROVIDER,
        code: text_field(body.get("infocode")),
        message: text_field(body.get("info")),
    })
}

fn parse_geocode_response(body: &Value, address: &str) -> Result<Coordinates, ProviderError> {
    body.get("geocodes")
        .and_then(Value::as_array)
        .and_then(|geocodes| geocodes.first())
        .and_then(|first| first.get("location"))
        .and_then(Value::as_str)
        .and_then(parse_lng_lat)
        .ok_or_else(|| ProviderError::NoResults {
            provider: PROVIDER,
            query: address.to_string(),
        })
}

/// Returns the center of the `"lng1,lat1;lng2,lat2"` rectangle.
fn parse_ip_response(body: &Value) -> Result<Coordinates, ProviderError> {
    let rectangle = text_field(body.get("rectangle"));
    let (sw, ne) = rectangle
        .split_once(';')
        .and_then(|(a, b)| Some((parse_lng_lat(a)?, parse_lng_lat(b)?)))
        .ok_or_else(|| ProviderError::NoResults {
            provider: PROVIDER,
            query: "IP location".to_string(),
        })?;

    Ok(Coordinates::new(
        f64::midpoint(sw.lat, ne.lat),
        f64::midpoint(sw.lng, ne.lng),
    ))
}

fn pois_array(body: &Value) -> Result<&[Value], ProviderError> {
    match body.get("pois") {
        Some(Value::Array(pois)) => Ok(pois.as_slice()),
        None | Some(Value::Null) => Ok(&[]),
        Some(_) => Err(ProviderError::Parse {
            provider: PROVIDER,
            message: "'pois' is not an array".to_string(),
        }),
    }
}

/// Normalizer for Amap place objects.
pub struct AmapNormalizer;

impl PoiNormalizer for AmapNormalizer {
    fn provider(&self) -> ProviderId {
        PROVIDER
    }

    fn normalize(&self, raw: &Value) -> Option<CanonicalPoi> {
        let name = text_field(raw.get("name"));
        if name.is_empty() {
            return None;
        }
        let location = raw.get("location").and_then(Value::as_str).and_then(parse_lng_lat)?;
        let native_id = text_field(raw.get("id"));

        let biz_ext = raw.get("biz_ext");
        let type_text = text_field(raw.get("type"));
        let tag_text = text_field(raw.get("tag"));

        let mut poi = CanonicalPoi::new(PROVIDER, &native_id, name, location);
        poi.address = text_field(raw.get("address"));
        poi.phone = text_field(raw.get("tel"));
        poi.rating = parse_rating(biz_ext.and_then(|b| b.get("rating")));
        poi.price_bucket = parse_price_bucket(parse_cost(biz_ext.and_then(|b| b.get("cost"))));
        poi.opening_hours = text_field(biz_ext.and_then(|b| b.get("open_time")));
        poi.cuisine_type = extract_cuisine_type(&format!("{type_text};{tag_text}"));
        poi.image_url = raw
            .get("photos")
            .and_then(Value::as_array)
            .and_then(|photos| photos.first())
            .map(|photo| text_field(photo.get("url")))
            .unwrap_or_default();
        poi.tags = split_tags([type_text.as_str(), tag_text.as_str()]);

        Some(poi)
    }
}
