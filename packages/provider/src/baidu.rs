//! Baidu Maps web service adapter.
//!
//! - Geocode: `GET /geocoding/v3/`
//! - IP location: `GET /location/ip`
//! - Radius and region search: `GET /place/v2/search`
//!
//! Baidu natively speaks BD-09; every request asks for GCJ-02 input and
//! output so that its places line up with the other providers during
//! deduplication.
//!
//! See <https://lbsyun.baidu.com/faq/api?title=webapi>

use std::time::Duration;

use food_map_poi_models::{CanonicalPoi, Coordinates, ProviderId};
use serde_json::Value;

use crate::normalize::{
    PoiNormalizer, extract_cuisine_type, parse_cost, parse_count, parse_integer,
    parse_lat_lng_object, parse_number, parse_price_bucket, parse_rating, split_tags, text_field,
};
use crate::{Capability, PoiProvider, ProviderError, RadiusQuery, RegionQuery, http};

const PROVIDER: ProviderId = ProviderId::Baidu;

/// Baidu's `coord_type` value for GCJ-02 input.
const COORD_TYPE_GCJ02: &str = "2";

/// Baidu Maps web service client.
pub struct BaiduProvider {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: String,
    pub(crate) base_url: String,
    pub(crate) timeout: Duration,
    pub(crate) region_search: bool,
    pub(crate) ip_locate: bool,
    pub(crate) default_tag: String,
    pub(crate) page_size: u32,
}

impl BaiduProvider {
    async fn get(&self, path: &str, params: Vec<(&str, String)>) -> Result<Value, ProviderError> {
        let mut params = params;
        params.push(("ak", self.api_key.clone()));
        params.push(("output", "json".to_string()));

        let url = format!("{}{path}", self.base_url);
        let body = http::get_json(&self.client, PROVIDER, &url, &params, self.timeout).await?;
        check_status(&body)?;
        Ok(body)
    }

    fn search_params<'a>(&self, keyword: &str) -> Vec<(&'a str, String)> {
        vec![
            ("query", keyword.to_string()),
            ("tag", self.default_tag.clone()),
            ("scope", "2".to_string()),
            ("page_size", self.page_size.to_string()),
            ("page_num", "0".to_string()),
            ("ret_coordtype", "gcj02ll".to_string()),
        ]
    }
}

#[async_trait::async_trait]
impl PoiProvider for BaiduProvider {
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
            .get(
                "/geocoding/v3/",
                vec![
                    ("address", address.to_string()),
                    ("ret_coordtype", "gcj02ll".to_string()),
                ],
            )
            .await?;
        parse_geocode_response(&body, address)
    }

    async fn ip_locate(&self) -> Result<Coordinates, ProviderError> {
        if !self.ip_locate {
            return Err(ProviderError::Unsupported {
                provider: PROVIDER,
                capability: Capability::IpLocate,
            });
        }
        let body = self
            .get("/location/ip", vec![("coor", "gcj02".to_string())])
            .await?;
        parse_ip_response(&body)
    }

    async fn search_by_radius(
        &self,
        query: &RadiusQuery<'_>,
    ) -> Result<Vec<CanonicalPoi>, ProviderError> {
        if let Some(code) = query.poi_type_code {
            log::debug!("{PROVIDER}: ignoring POI type code {code}, using tag filter");
        }
        let center = query.center;
        let mut params = self.search_params(query.keyword);
        params.push(("location", format!("{:.6},{:.6}", center.lat, center.lng)));
        params.push(("radius", query.radius_meters.to_string()));
        params.push(("coord_type", COORD_TYPE_GCJ02.to_string()));

        let body = self.get("/place/v2/search", params).await?;
        Ok(BaiduNormalizer.normalize_all(results_array(&body)?, Some(center)))
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
        let mut params = self.search_params(query.keyword);
        params.push(("region", query.region.to_string()));
        params.push(("city_limit", query.city_limit.to_string()));

        let body = self.get("/place/v2/search", params).await?;
        Ok(BaiduNormalizer.normalize_all(results_array(&body)?, None))
    }
}

/// Maps a non-zero status to [`ProviderError::Status`].
fn check_status(body: &Value) -> Result<(), ProviderError> {
    if parse_integer(body.get("status")) == Some(0) {
        return Ok(());
    }
    let message = [body.get("message"), body.get("msg")]
        .into_iter()
        .map(text_field)
        .find(|m| !m.is_empty())
        .unwrap_or_default();
    Err(ProviderError::Status {
        provider: PROVIDER,
        code: text_field(body.get("status")),
        message,
    })
}

fn parse_geocode_response(body: &Value, address: &str) -> Result<Coordinates, ProviderError> {
    parse_lat_lng_object(body.pointer("/result/location")).ok_or_else(|| {
        ProviderError::NoResults {
            provider: PROVIDER,
            query: address.to_string(),
        }
    })
}

/// Reads `content.point.{x,y}` (longitude, latitude as strings).
fn parse_ip_response(body: &Value) -> Result<Coordinates, ProviderError> {
    let point = body.pointer("/content/point");
    let lng = parse_number(point.and_then(|p| p.get("x")));
    let lat = parse_number(point.and_then(|p| p.get("y")));

    match (lat, lng) {
        (Some(lat), Some(lng)) => Ok(Coordinates::new(lat, lng)),
        _ => Err(ProviderError::NoResults {
            provider: PROVIDER,
            query: "IP location".to_string(),
        }),
    }
}

fn results_array(body: &Value) -> Result<&[Value], ProviderError> {
    match body.get("results") {
        Some(Value::Array(results)) => Ok(results.as_slice()),
        None | Some(Value::Null) => Ok(&[]),
        Some(_) => Err(ProviderError::Parse {
            provider: PROVIDER,
            message: "'results' is not an array".to_string(),
        }),
    }
}

/// Normalizer for Baidu place objects.
pub struct BaiduNormalizer;

impl PoiNormalizer for BaiduNormalizer {
    fn provider(&self) -> ProviderId {
        PROVIDER
    }

    fn normalize(&self, raw: &Value) -> Option<CanonicalPoi> {
        let name = text_field(raw.get("name"));
        if name.is_empty() {
            return None;
        }
        let location = parse_lat_lng_object(raw.get("location"))?;
        // Baidu answers unresolvable places with a zero point.
        if location.lat.abs() < f64::EPSILON && location.lng.abs() < f64::EPSILON {
            return None;
        }
        let native_id = text_field(raw.get("uid"));

        let detail = raw.get("detail_info");
        let field = |key: &str| detail.and_then(|d| d.get(key));
        let tag_text = text_field(field("tag"));

        let mut poi = CanonicalPoi::new(PROVIDER, &native_id, name, location);
        poi.address = text_field(raw.get("address"));
        poi.phone = text_field(raw.get("telephone"));
        poi.rating = parse_rating(field("overall_rating"));
        poi.review_count = parse_count(field("comment_num"));
        poi.price_bucket = parse_price_bucket(parse_cost(field("price")));
        poi.opening_hours = text_field(field("shop_hours"));
        poi.cuisine_type = extract_cuisine_type(&tag_text);
        poi.tags = split_tags([tag_text.as_str()]);

        Some(poi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use food_map_poi_models::PriceBucket;
    use serde_json::json;

    #[test]
    fn status_check() {
        assert!(check_status(&json!({"status": 0})).is_ok());
        let err = check_status(&json!({"status": 240, "message": "APP 服务被禁用"})).unwrap_err();
        match err {
            ProviderError::Status { code, message, .. } => {
                assert_eq!(code, "240");
                assert_eq!(message, "APP 服务被禁用");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(check_status(&json!({})).is_err());
    }

    #[test]
    fn parses_geocode() {
        let body = json!({"status": 0, "result": {"location": {"lng": 116.307_49, "lat": 40.056_88}}});
        let c = parse_geocode_response(&body, "百度大厦").unwrap();
        assert!((c.lat - 40.056_88).abs() < 1e-9);
        assert!((c.lng - 116.307_49).abs() < 1e-9);
    }

    #[test]
    fn parses_ip_point() {
        let body = json!({"status": 0, "content": {"point": {"x": "116.40387397", "y": "39.91488908"}}});
        let c = parse_ip_response(&body).unwrap();
        assert!((c.lat - 39.914_889_08).abs() < 1e-9);
        assert!((c.lng - 116.403_873_97).abs() < 1e-9);
        assert!(parse_ip_response(&json!({"status": 0, "content": {}})).is_err());
    }

    #[test]
    fn normalizes_place() {
        let raw = json!({
            "uid": "a1b2c3",
            "name": "蜀香火锅",
            "location": {"lat": 39.915, "lng": 116.404},
            "address": "东城区王府井大街88号",
            "telephone": "(010)87654321",
            "detail_info": {
                "tag": "美食;火锅",
                "overall_rating": "4.7",
                "price": "128",
                "comment_num": "356",
                "shop_hours": "11:00-23:00",
                "distance": 12
            }
        });
        let poi = BaiduNormalizer.normalize(&raw).unwrap();
        assert_eq!(poi.id, "baidu:a1b2c3");
        assert!((poi.rating - 4.7).abs() < f64::EPSILON);
        assert_eq!(poi.review_count, 356);
        assert_eq!(poi.price_bucket, PriceBucket::Expensive);
        assert_eq!(poi.cuisine_type, "火锅");
        assert_eq!(poi.tags, vec!["美食", "火锅"]);
        assert_eq!(poi.opening_hours, "11:00-23:00");
    }

    #[test]
    fn skips_zero_point() {
        let raw = json!({"uid": "z", "name": "零点", "location": {"lat": 0, "lng": 0}});
        assert!(BaiduNormalizer.normalize(&raw).is_none());
    }

    #[test]
    fn place_without_detail_is_unrated() {
        let raw = json!({"uid": "d", "name": "小店", "location": {"lat": 39.9, "lng": 116.4}});
        let poi = BaiduNormalizer.normalize(&raw).unwrap();
        assert!(poi.rating.abs() < f64::EPSILON);
        assert_eq!(poi.price_bucket, PriceBucket::Unknown);
        assert!(poi.tags.is_empty());
    }
}
