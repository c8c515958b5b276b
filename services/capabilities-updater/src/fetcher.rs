//! GetCapabilities requests and response validation.
//!
//! A response is accepted only when:
//! - the status is 200
//! - the Content-Type, if sent, is an XML type
//! - the charset header and the XML declaration agree on the encoding
//! - the root element matches the requested service type and version
//!
//! Accepted responses are decoded to text with the XML declaration removed.

use std::borrow::Cow;

use async_trait::async_trait;
use encoding_rs::Encoding;
use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use quick_xml::Reader;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use tracing::{debug, instrument, warn};
use url::form_urlencoded;

use ogc_common::key::normalize_version;
use ogc_common::{
    has_query_param, simplify_url, Credentials, LayerRef, ServiceError, ServiceResult, ServiceType,
    UrlTypeVersionKey,
};

use crate::config::FetchConfig;

const WMS_NAMESPACE: &str = "http://www.opengis.net/wms";
const WFS_NAMESPACE: &str = "http://www.opengis.net/wfs";
const WMTS_NAMESPACE: &str = "http://www.opengis.net/wmts";

const WMS_ROOT: &str = "WMS_Capabilities";
const WMS_LEGACY_ROOT: &str = "WMT_MS_Capabilities";
const WFS_ROOT: &str = "WFS_Capabilities";
const WMTS_ROOT: &str = "Capabilities";

const WMS_130: &str = "1.3.0";
const DEFAULT_ENCODING: &str = "UTF-8";

/// What to fetch and how to authenticate.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchRequest {
    pub url: String,
    pub service_type: ServiceType,
    pub version: Option<String>,
    pub credentials: Option<Credentials>,
}

impl FetchRequest {
    pub fn for_layer(layer: &LayerRef) -> Self {
        Self {
            url: layer.url.clone(),
            service_type: layer.service_type,
            version: normalize_version(layer.version.as_deref()),
            credentials: layer.credentials.clone(),
        }
    }

    pub fn for_key(key: &UrlTypeVersionKey, credentials: Option<Credentials>) -> Self {
        Self {
            url: key.url().to_string(),
            service_type: key.service_type(),
            version: key.version().map(str::to_string),
            credentials,
        }
    }

    pub fn key(&self) -> UrlTypeVersionKey {
        UrlTypeVersionKey::new(&self.url, self.service_type, self.version.as_deref())
    }
}

/// A validated, decoded GetCapabilities response.
#[derive(Debug, Clone, PartialEq)]
pub struct FetchedCapabilities {
    /// Request URL including the GetCapabilities parameters
    pub url: String,
    /// Encoding the body was decoded from
    pub encoding: String,
    /// Decoded XML without declaration
    pub data: String,
}

/// Decoded body of an accepted response.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedBody {
    pub encoding: String,
    pub data: String,
}

/// Source of GetCapabilities documents.
#[async_trait]
pub trait CapabilitiesSource: Send + Sync {
    async fn fetch(&self, request: &FetchRequest) -> ServiceResult<FetchedCapabilities>;
}

/// Fetches capabilities over HTTP with reqwest.
pub struct HttpCapabilitiesFetcher {
    client: Client,
    config: FetchConfig,
}

impl HttpCapabilitiesFetcher {
    pub fn new(config: FetchConfig) -> ServiceResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .map_err(|e| ServiceError::Config(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn network_error(&self, url: &str, err: reqwest::Error) -> ServiceError {
        if err.is_timeout() {
            ServiceError::NetworkError(format!(
                "Timed out after {:?} requesting {}",
                self.config.timeout,
                url
            ))
        } else {
            ServiceError::NetworkError(format!("Request to {} failed: {}", url, err))
        }
    }
}

#[async_trait]
impl CapabilitiesSource for HttpCapabilitiesFetcher {
    #[instrument(skip(self, request), fields(url = %request.url, service = %request.service_type))]
    async fn fetch(&self, request: &FetchRequest) -> ServiceResult<FetchedCapabilities> {
        let url = capabilities_url(&request.url, request.service_type, request.version.as_deref());

        let mut builder = self.client.get(&url);
        if let Some(credentials) = &request.credentials {
            builder = builder.basic_auth(&credentials.username, Some(&credentials.password));
        }

        let response = builder
            .send()
            .await
            .map_err(|e| self.network_error(&url, e))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| self.network_error(&url, e))?;

        let validated = validate_response(
            status,
            content_type.as_deref(),
            &body,
            request.service_type,
            request.version.as_deref(),
        )?;

        debug!(
            url = %url,
            encoding = %validated.encoding,
            bytes = body.len(),
            "Fetched capabilities"
        );

        Ok(FetchedCapabilities {
            url,
            encoding: validated.encoding,
            data: validated.data,
        })
    }
}

/// GetCapabilities URL for a service endpoint.
///
/// Parameters already present in the configured URL (matched without regard
/// to case) are never added a second time.
pub fn capabilities_url(url: &str, service_type: ServiceType, version: Option<&str>) -> String {
    let base = simplify_url(url);
    let version = normalize_version(version);
    let negotiation_key = service_type.version_negotiation_key();

    let mut params: Vec<(&str, &str)> = Vec::new();
    if !has_query_param(&base, "service") {
        params.push(("service", service_type.as_str()));
    }
    if !has_query_param(&base, "request") {
        params.push(("request", "GetCapabilities"));
    }
    if let Some(v) = version.as_deref() {
        if !has_query_param(&base, "version") && !has_query_param(&base, negotiation_key) {
            params.push((negotiation_key, v));
        }
    }

    if params.is_empty() {
        return base;
    }
    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    let separator = if base.contains('?') { '&' } else { '?' };
    format!("{}{}{}", base, separator, query)
}

/// Validate a raw response and decode its body.
pub fn validate_response(
    status: u16,
    content_type: Option<&str>,
    body: &[u8],
    service_type: ServiceType,
    version: Option<&str>,
) -> ServiceResult<ValidatedBody> {
    if status != 200 {
        return Err(ServiceError::UnexpectedStatus(status));
    }
    if let Some(ct) = content_type {
        if !ct.to_ascii_lowercase().contains("xml") {
            return Err(ServiceError::UnexpectedContentType(ct.to_string()));
        }
    }

    let label = resolve_encoding(content_type.and_then(charset_param), prolog_encoding(body))?;
    let encoding = Encoding::for_label(label.trim().as_bytes())
        .ok_or_else(|| ServiceError::Validation(format!("Unsupported encoding '{}'", label)))?;

    let (text, had_errors) = encoding.decode_with_bom_removal(body);
    if had_errors {
        warn!(encoding = encoding.name(), "Response contained malformed byte sequences");
    }
    let data = strip_declaration(&text).to_string();

    let (namespace, root) = root_element(&data)?;
    validate_root(service_type, version, namespace.as_deref(), &root)?;

    Ok(ValidatedBody {
        encoding: encoding.name().to_string(),
        data,
    })
}

/// Header charset wins; a differing declaration is an error.
fn resolve_encoding(header: Option<String>, declared: Option<String>) -> ServiceResult<String> {
    match (header, declared) {
        (Some(h), Some(d)) if !h.eq_ignore_ascii_case(&d) => Err(ServiceError::Validation(format!(
            "Encoding conflict: Content-Type charset '{}', XML declaration '{}'",
            h, d
        ))),
        (Some(h), _) => Ok(h),
        (None, Some(d)) => Ok(d),
        (None, None) => Ok(DEFAULT_ENCODING.to_string()),
    }
}

/// `charset` parameter of a Content-Type value.
fn charset_param(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        if !name.trim().eq_ignore_ascii_case("charset") {
            return None;
        }
        let value = value.trim().trim_matches('"').trim();
        (!value.is_empty()).then(|| value.to_string())
    })
}

/// `encoding` attribute of the XML declaration, if the body starts with one.
fn prolog_encoding(body: &[u8]) -> Option<String> {
    let body = body.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(body);
    let mut reader = Reader::from_reader(body);
    reader.trim_text(true);

    match reader.read_event() {
        Ok(Event::Decl(decl)) => decl
            .encoding()
            .and_then(|r| r.ok())
            .map(|enc| String::from_utf8_lossy(&enc).trim().to_string())
            .filter(|enc| !enc.is_empty()),
        _ => None,
    }
}

/// Text with a leading BOM, whitespace and XML declaration removed.
fn strip_declaration(text: &str) -> &str {
    let text = text.trim_start_matches('\u{feff}').trim_start();
    if text.starts_with("<?xml") {
        if let Some(end) = text.find("?>") {
            return text[end + 2..].trim_start();
        }
    }
    text
}

/// Namespace URI and local name of the root element.
fn root_element(xml: &str) -> ServiceResult<(Option<String>, String)> {
    let mut reader = NsReader::from_str(xml);
    reader.trim_text(true);

    loop {
        match reader.read_resolved_event() {
            Ok((ns, Event::Start(e))) | Ok((ns, Event::Empty(e))) => {
                let namespace = match ns {
                    ResolveResult::Bound(Namespace(uri)) => {
                        Some(String::from_utf8_lossy(uri).into_owned())
                    }
                    _ => None,
                };
                let local = String::from_utf8_lossy(e.local_name().as_ref()).into_owned();
                return Ok((namespace, local));
            }
            Ok((_, Event::Eof)) => {
                return Err(ServiceError::Validation(
                    "Response has no root element".to_string(),
                ))
            }
            Ok(_) => {}
            Err(e) => {
                return Err(ServiceError::Validation(format!(
                    "Malformed XML before root element: {}",
                    e
                )))
            }
        }
    }
}

/// `ns` is the base namespace or a versioned form of it.
fn in_namespace(ns: Option<&str>, base: &str) -> bool {
    match ns {
        Some(ns) => {
            ns == base || ns.strip_prefix(base).map_or(false, |rest| rest.starts_with('/'))
        }
        None => false,
    }
}

fn describe_root(ns: Option<&str>, root: &str) -> String {
    match ns {
        Some(ns) => format!("{{{}}}{}", ns, root),
        None => root.to_string(),
    }
}

fn validate_root(
    service_type: ServiceType,
    version: Option<&str>,
    ns: Option<&str>,
    root: &str,
) -> ServiceResult<()> {
    let wms_130 = in_namespace(ns, WMS_NAMESPACE) && root == WMS_ROOT;
    let wms_legacy = ns.is_none() && root == WMS_LEGACY_ROOT;

    let (accepted, expected): (bool, Cow<'static, str>) = match service_type {
        ServiceType::Wms => match normalize_version(version).as_deref() {
            None => (
                wms_130 || wms_legacy,
                format!("{{{}}}{} or {}", WMS_NAMESPACE, WMS_ROOT, WMS_LEGACY_ROOT).into(),
            ),
            Some(WMS_130) => (wms_130, format!("{{{}}}{}", WMS_NAMESPACE, WMS_ROOT).into()),
            Some(_) => (wms_legacy, WMS_LEGACY_ROOT.into()),
        },
        ServiceType::Wfs => (
            in_namespace(ns, WFS_NAMESPACE) && root == WFS_ROOT,
            format!("{{{}}}{}", WFS_NAMESPACE, WFS_ROOT).into(),
        ),
        ServiceType::Wmts => (
            in_namespace(ns, WMTS_NAMESPACE) && root == WMTS_ROOT,
            format!("{{{}}}{}", WMTS_NAMESPACE, WMTS_ROOT).into(),
        ),
    };

    if accepted {
        Ok(())
    } else {
        Err(ServiceError::mismatch(
            "root element",
            expected,
            describe_root(ns, root),
        ))
    }
}
