//! Analytics event enrichment.
//!
//! Client events (page view, car view, search, contact seller) are tagged
//! with a session id, a device class guessed from the user agent, and the UI
//! language before being forwarded to the tag endpoint. Contact-seller events
//! double as conversions.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::types::{DbId, Timestamp};

/// Currency attached to conversion events.
pub const CONVERSION_CURRENCY: &str = "USD";

/// Fixed value attached to every contact-seller conversion.
pub const CONVERSION_VALUE: f64 = 1.0;

/// Language used when neither the client nor `Accept-Language` names one.
pub const DEFAULT_LANGUAGE: &str = "en";

/// Languages the UI ships.
pub const SUPPORTED_LANGUAGES: &[&str] = &["en", "ar"];

static TABLET_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)tablet|ipad|playbook|silk")
        .unwrap_or_else(|e| panic!("invalid tablet user-agent pattern: {e}"))
});

static ANDROID_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)android").unwrap_or_else(|e| panic!("invalid android pattern: {e}"))
});

static MOBI_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mobi").unwrap_or_else(|e| panic!("invalid mobi pattern: {e}"))
});

static MOBILE_UA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)mobile|iphone|ipod|android|blackberry|opera mini|iemobile|wpdesktop")
        .unwrap_or_else(|e| panic!("invalid mobile user-agent pattern: {e}"))
});

/// Coarse device class derived from the user agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    Desktop,
}

impl DeviceClass {
    /// Classify a user agent. Tablets are checked first because most tablet
    /// agents also match the mobile pattern. Android without a `Mobi` token
    /// is a tablet.
    pub fn from_user_agent(user_agent: &str) -> Self {
        let android_tablet =
            ANDROID_UA.is_match(user_agent) && !MOBI_UA.is_match(user_agent);
        if TABLET_UA.is_match(user_agent) || android_tablet {
            DeviceClass::Tablet
        } else if MOBILE_UA.is_match(user_agent) {
            DeviceClass::Mobile
        } else {
            DeviceClass::Desktop
        }
    }
}

/// An event reported by the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    PageView {
        path: String,
        title: Option<String>,
    },
    CarView {
        car_id: DbId,
        brand: Option<String>,
        model: Option<String>,
        price: Option<f64>,
    },
    Search {
        query: String,
        #[serde(default)]
        filters: serde_json::Value,
        results_count: Option<i64>,
    },
    ContactSeller {
        car_id: DbId,
        /// How the buyer reached out, e.g. `whatsapp`, `phone`, `message`.
        method: String,
    },
}

impl AnalyticsEvent {
    /// Event name sent to the tag.
    pub fn name(&self) -> &'static str {
        match self {
            AnalyticsEvent::PageView { .. } => "page_view",
            AnalyticsEvent::CarView { .. } => "car_view",
            AnalyticsEvent::Search { .. } => "search",
            AnalyticsEvent::ContactSeller { .. } => "contact_seller",
        }
    }

    pub fn is_conversion(&self) -> bool {
        matches!(self, AnalyticsEvent::ContactSeller { .. })
    }
}

/// Request-derived context attached to every event.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EventContext {
    pub session_id: String,
    pub device: DeviceClass,
    pub language: String,
    pub user_id: Option<DbId>,
}

impl EventContext {
    /// Build the context from what the request carries.
    ///
    /// A missing session id gets a fresh UUID. The language falls back from
    /// the explicit value to the first supported `Accept-Language` tag and
    /// then to [`DEFAULT_LANGUAGE`].
    pub fn resolve(
        session_id: Option<&str>,
        user_agent: Option<&str>,
        language: Option<&str>,
        accept_language: Option<&str>,
        user_id: Option<DbId>,
    ) -> Self {
        let session_id = session_id
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let device = user_agent
            .map(DeviceClass::from_user_agent)
            .unwrap_or(DeviceClass::Desktop);

        let language = language
            .and_then(normalize_language)
            .or_else(|| accept_language.and_then(language_from_accept_header))
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());

        Self {
            session_id,
            device,
            language,
            user_id,
        }
    }
}

/// Reduce a language tag like `ar-EG` to a supported primary subtag.
pub fn normalize_language(tag: &str) -> Option<String> {
    let primary = tag.trim().split(['-', '_']).next()?.to_ascii_lowercase();
    SUPPORTED_LANGUAGES
        .contains(&primary.as_str())
        .then_some(primary)
}

/// First supported language in an `Accept-Language` header, in listed order.
pub fn language_from_accept_header(header: &str) -> Option<String> {
    header
        .split(',')
        .filter_map(|part| part.split(';').next())
        .find_map(normalize_language)
}

/// An event ready to hand to the tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedEvent {
    pub name: &'static str,
    pub event: AnalyticsEvent,
    pub context: EventContext,
    pub is_conversion: bool,
    pub value: Option<f64>,
    pub currency: Option<&'static str>,
    pub occurred_at: Timestamp,
}

/// Attach context and conversion data to a client event.
pub fn enrich(event: AnalyticsEvent, context: EventContext, occurred_at: Timestamp) -> EnrichedEvent {
    let is_conversion = event.is_conversion();
    EnrichedEvent {
        name: event.name(),
        is_conversion,
        value: is_conversion.then_some(CONVERSION_VALUE),
        currency: is_conversion.then_some(CONVERSION_CURRENCY),
        event,
        context,
        occurred_at,
    }
}

impl EnrichedEvent {
    /// Flat parameter map in the shape tag endpoints expect.
    pub fn params(&self) -> serde_json::Value {
        let mut params = match serde_json::to_value(&self.event) {
            Ok(serde_json::Value::Object(map)) => map,
            _ => serde_json::Map::new(),
        };
        params.remove("event");
        params.insert("session_id".into(), self.context.session_id.clone().into());
        params.insert(
            "device_type".into(),
            serde_json::to_value(self.context.device).unwrap_or_default(),
        );
        params.insert("language".into(), self.context.language.clone().into());
        if let Some(value) = self.value {
            params.insert("value".into(), value.into());
        }
        if let Some(currency) = self.currency {
            params.insert("currency".into(), currency.into());
        }
        serde_json::Value::Object(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    const IPHONE: &str = "Mozilla/5.0 (iPhone; CPU iPhone OS 17_0 like Mac OS X) \
        AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.0 Mobile/15E148 Safari/604.1";
    const IPAD: &str = "Mozilla/5.0 (iPad; CPU OS 16_6 like Mac OS X) AppleWebKit/605.1.15";
    const ANDROID_PHONE: &str =
        "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 Chrome/120.0 Mobile Safari/537.36";
    const ANDROID_TABLET: &str =
        "Mozilla/5.0 (Linux; Android 13; SM-X700) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";
    const DESKTOP: &str =
        "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 Chrome/120.0 Safari/537.36";

    #[test]
    fn device_classification() {
        assert_eq!(DeviceClass::from_user_agent(IPHONE), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(ANDROID_PHONE), DeviceClass::Mobile);
        assert_eq!(DeviceClass::from_user_agent(IPAD), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_user_agent(ANDROID_TABLET), DeviceClass::Tablet);
        assert_eq!(DeviceClass::from_user_agent(DESKTOP), DeviceClass::Desktop);
    }

    #[test]
    fn language_resolution_order() {
        let ctx = EventContext::resolve(Some("s1"), None, Some("ar"), Some("en-US"), None);
        assert_eq!(ctx.language, "ar");

        let ctx = EventContext::resolve(Some("s1"), None, None, Some("fr-FR,ar-EG;q=0.8"), None);
        assert_eq!(ctx.language, "ar");

        let ctx = EventContext::resolve(Some("s1"), None, Some("de"), None, None);
        assert_eq!(ctx.language, DEFAULT_LANGUAGE);
    }

    #[test]
    fn missing_session_id_is_generated() {
        let ctx = EventContext::resolve(None, None, None, None, None);
        assert_eq!(ctx.session_id.len(), 36);

        let ctx = EventContext::resolve(Some("   "), None, None, None, None);
        assert_eq!(ctx.session_id.len(), 36);

        let ctx = EventContext::resolve(Some("abc"), None, None, None, Some(5));
        assert_eq!(ctx.session_id, "abc");
        assert_eq!(ctx.user_id, Some(5));
        assert_eq!(ctx.device, DeviceClass::Desktop);
    }

    #[test]
    fn contact_seller_is_a_conversion() {
        let ctx = EventContext::resolve(Some("s"), Some(IPHONE), None, None, None);
        let enriched = enrich(
            AnalyticsEvent::ContactSeller {
                car_id: 7,
                method: "whatsapp".into(),
            },
            ctx,
            Utc::now(),
        );
        assert!(enriched.is_conversion);
        assert_eq!(enriched.value, Some(CONVERSION_VALUE));
        assert_eq!(enriched.currency, Some("USD"));

        let params = enriched.params();
        assert_eq!(params["car_id"], 7);
        assert_eq!(params["device_type"], "mobile");
        assert_eq!(params["currency"], "USD");
        assert!(params.get("event").is_none());
    }

    #[test]
    fn page_view_is_not_a_conversion() {
        let ctx = EventContext::resolve(Some("s"), None, None, None, None);
        let enriched = enrich(
            AnalyticsEvent::PageView {
                path: "/sa/cars".into(),
                title: None,
            },
            ctx,
            Utc::now(),
        );
        assert_eq!(enriched.name, "page_view");
        assert!(!enriched.is_conversion);
        assert!(enriched.params().get("value").is_none());
    }

    #[test]
    fn events_deserialize_from_tagged_json() {
        let event: AnalyticsEvent = serde_json::from_value(serde_json::json!({
            "event": "search",
            "query": "camry",
            "results_count": 12
        }))
        .unwrap();
        assert_eq!(event.name(), "search");
    }
}
