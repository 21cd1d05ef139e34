//! Site API models.
//!
//! The status payload is large and sparsely populated; every record defaults its
//! missing or `null` fields so a partial answer (for example an error response)
//! still decodes. Only `res` must be a real value.

use chrono::{DateTime, TimeZone, Utc};
use incapsula_core::form::{FormParams, Pairs};
use incapsula_core::ids::{AccountId, SiteId};
use incapsula_core::types::ResultCode;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// `param` value that may legitimately answer `res == 1` while a wildcard
/// certificate is being reused.
pub const PARAM_DOMAIN_VALIDATION: &str = "domain_validation";

/// SAN status meaning validation is still waiting on the customer.
pub const SAN_PENDING_USER_ACTION: &str = "PENDING_USER_ACTION";

/// Form arguments for `sites/add`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddSiteRequest {
    /// Domain to onboard.
    pub domain: String,
    /// Customer reference id.
    pub ref_id: Option<String>,
    /// Whether setup emails are sent.
    pub send_site_setup_emails: Option<bool>,
    /// Origin IP override.
    pub site_ip: Option<String>,
    /// Force SSL towards the origin.
    pub force_ssl: Option<bool>,
    /// Owning (sub-)account; omitted when absent or zero.
    pub account_id: Option<AccountId>,
    /// Add the naked domain as a SAN.
    pub naked_domain_san: bool,
    /// Use a wildcard SAN.
    pub wildcard_san: bool,
    /// Logs account id.
    pub logs_account_id: Option<String>,
}

impl AddSiteRequest {
    /// Request for the given domain with everything else unset.
    #[must_use]
    pub fn new(domain: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            ..Self::default()
        }
    }

    /// Set the owning account.
    #[must_use]
    pub fn with_account_id(mut self, account_id: AccountId) -> Self {
        self.account_id = Some(account_id);
        self
    }

    /// Set the SAN options.
    #[must_use]
    pub fn with_sans(mut self, naked_domain_san: bool, wildcard_san: bool) -> Self {
        self.naked_domain_san = naked_domain_san;
        self.wildcard_san = wildcard_san;
        self
    }

    /// Convert to form pairs. Unset optional arguments are sent empty, as the
    /// service expects every key except `account_id`.
    #[must_use]
    pub fn to_form(&self) -> Pairs {
        fn text<T: ToString>(value: Option<&T>) -> String {
            value.map(ToString::to_string).unwrap_or_default()
        }

        let mut params = FormParams::new();
        params.push("domain", &self.domain);
        params.push("ref_id", text(self.ref_id.as_ref()));
        params.push(
            "send_site_setup_emails",
            text(self.send_site_setup_emails.as_ref()),
        );
        params.push("site_ip", text(self.site_ip.as_ref()));
        params.push("force_ssl", text(self.force_ssl.as_ref()));
        params.push("naked_domain_san", self.naked_domain_san);
        params.push("wildcard_san", self.wildcard_san);
        params.push("logs_account_id", text(self.logs_account_id.as_ref()));
        params.push_opt("account_id", self.account_id.filter(|id| !id.is_zero()));
        params.into_pairs()
    }
}

/// Answer of `sites/add`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteAddResponse {
    /// Id of the new site.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub site_id: SiteId,
    /// Result code.
    pub res: ResultCode,
}

/// Answer of `sites/configure`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteUpdateResponse {
    /// Site that was updated.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub site_id: SiteId,
    /// Result code.
    pub res: ResultCode,
}

/// Answer of `sites/delete`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SiteDeleteResponse {
    /// Result code.
    pub res: ResultCode,
    /// Human readable result.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub res_message: String,
}

/// DNS record the customer is asked to create (name/type/targets).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DnsRecord {
    /// Record name.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub dns_record_name: String,
    /// Record type (`A`, `CNAME`, `TXT`...).
    #[serde(deserialize_with = "deserialize_nullable")]
    pub set_type_to: String,
    /// Record targets.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub set_data_to: Vec<String>,
}

/// Full site record returned by `sites/status`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SiteStatusResponse {
    /// Site id.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub site_id: SiteId,
    /// Provisioning status.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub status: String,
    /// Domain.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub domain: String,
    /// Customer reference id.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub ref_id: String,
    /// Owning account.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub account_id: AccountId,
    /// Acceleration level label.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub acceleration_level: String,
    /// Acceleration level raw value.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub acceleration_level_raw: String,
    /// Creation time in epoch milliseconds.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub site_creation_date: i64,
    /// Origin IPs.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub ips: Vec<String>,
    /// DNS records pointing at the service.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub dns: Vec<DnsRecord>,
    /// DNS records found before onboarding.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub original_dns: Vec<DnsRecord>,
    /// Warnings.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub warnings: Vec<Value>,
    /// `active` or `bypass`.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub active: String,
    /// Whether CNAME reuse is restricted.
    #[serde(skip_serializing_if = "std::ops::Not::not", deserialize_with = "deserialize_nullable")]
    pub restricted_cname_reuse: bool,
    /// Whether all TLS versions are accepted.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub support_all_tls_versions: bool,
    /// Wildcard SAN replaces the full domain SAN.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub use_wildcard_san_instead_of_full_domain_san: bool,
    /// Naked domain SAN is added.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub add_naked_domain_san: bool,
    /// Additional errors.
    #[serde(rename = "additionalErrors", deserialize_with = "deserialize_nullable")]
    pub additional_errors: Vec<Value>,
    /// Display name.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub display_name: String,
    /// WAF and ACL settings.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub security: SecuritySettings,
    /// Seal placement.
    #[serde(rename = "sealLocation", deserialize_with = "deserialize_nullable")]
    pub seal_location: SealLocation,
    /// SSL settings.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub ssl: SslSettings,
    /// Two-factor settings.
    #[serde(rename = "siteDualFactorSettings", deserialize_with = "deserialize_nullable")]
    pub site_dual_factor_settings: DualFactorSettings,
    /// Login protect settings.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub login_protect: LoginProtect,
    /// Caching and optimisation settings.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub performance_configuration: PerformanceConfiguration,
    /// Extended DDoS setting.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub extended_ddos: i64,
    /// Exception id reported on failures.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub exception_id: String,
    /// Log level.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub log_level: String,
    /// Result code.
    pub res: ResultCode,
    /// Human readable result.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub res_message: String,
    /// Debug details.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub debug_info: DebugInfo,
}

impl SiteStatusResponse {
    /// Creation time, if the service reported one.
    #[must_use]
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        if self.site_creation_date == 0 {
            return None;
        }
        Utc.timestamp_millis_opt(self.site_creation_date).single()
    }

    /// DNS validation records of the generated certificate, when validation is
    /// done over DNS. Other methods report a differently shaped payload.
    #[must_use]
    pub fn dns_validation_records(&self) -> Vec<DnsRecord> {
        serde_json::from_value(self.ssl.generated_certificate.validation_data.clone())
            .unwrap_or_default()
    }
}

/// Security section of a site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SecuritySettings {
    /// WAF rules.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub waf: WafSettings,
    /// ACL rules.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub acls: AclSettings,
}

/// WAF rule list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WafSettings {
    /// Rules.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub rules: Vec<WafRule>,
}

/// One WAF rule as configured on a site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct WafRule {
    /// Action id.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub action: String,
    /// Action label.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub action_text: String,
    /// Rule id.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub id: String,
    /// Rule name.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub name: String,
    /// Block bad bots.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub block_bad_bots: bool,
    /// Challenge suspected bots.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub challenge_suspected_bots: bool,
    /// Activation mode id.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub activation_mode: String,
    /// Activation mode label.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub activation_mode_text: String,
    /// DDoS traffic threshold.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub ddos_traffic_threshold: i64,
    /// Unknown clients challenge.
    #[serde(skip_serializing_if = "String::is_empty", deserialize_with = "deserialize_nullable")]
    pub unknown_clients_challenge: String,
    /// Block non-essential bots.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub block_non_essential_bots: bool,
    /// Rule exceptions.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub exceptions: Vec<RuleException>,
}

/// ACL rule list.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AclSettings {
    /// Rules.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub rules: Vec<AclRule>,
}

/// One ACL rule (blacklisted IPs, countries or URLs).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AclRule {
    /// Matched IPs.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub ips: Vec<String>,
    /// Rule id.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub id: String,
    /// Rule name.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub name: String,
    /// Matched geography.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub geo: GeoFilter,
    /// Matched URLs.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub urls: Vec<UrlMatch>,
    /// Rule exceptions.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub exceptions: Vec<RuleException>,
}

/// Exception attached to a WAF or ACL rule.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RuleException {
    /// Exception criteria.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub values: Vec<ExceptionValue>,
    /// Exception id.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub id: i64,
}

/// One criterion of a rule exception.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ExceptionValue {
    /// Criterion id.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub id: String,
    /// Criterion name.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub name: String,
    /// IPs.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub ips: Vec<String>,
    /// URLs.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub urls: Vec<UrlMatch>,
    /// Geography.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub geo: GeoFilter,
    /// Client application ids.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub client_apps: Vec<String>,
    /// Client application types.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub client_app_types: Vec<String>,
    /// Query parameters.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub parameters: Vec<String>,
    /// User agents.
    #[serde(skip_serializing_if = "Vec::is_empty", deserialize_with = "deserialize_nullable")]
    pub user_agents: Vec<String>,
}

/// URL with its match pattern (`EQUALS`, `PREFIX`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct UrlMatch {
    /// URL value.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub value: String,
    /// Match pattern.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub pattern: String,
}

/// Countries and continents.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct GeoFilter {
    /// Country codes.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub countries: Vec<String>,
    /// Continent codes.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub continents: Vec<String>,
}

/// Where the security seal is shown.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SealLocation {
    /// Location id.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub id: String,
    /// Location label.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub name: String,
}

/// SSL section of a site.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SslSettings {
    /// Origin server SSL detection.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub origin_server: OriginServer,
    /// Custom certificate state.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub custom_certificate: CustomCertificate,
    /// Service-generated certificate.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub generated_certificate: GeneratedCertificate,
}

/// SSL detection on the origin.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OriginServer {
    /// Whether SSL was detected.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub detected: bool,
    /// Detection status.
    #[serde(rename = "detectionStatus", deserialize_with = "deserialize_nullable")]
    pub detection_status: String,
}

/// Custom certificate state.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CustomCertificate {
    /// Whether a custom certificate is active.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub active: bool,
}

/// Certificate generated by the service.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GeneratedCertificate {
    /// Issuing CA.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub ca: String,
    /// `DNS`, `EMAIL` or `HTML_FILE`.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub validation_method: String,
    /// Method-specific validation data.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub validation_data: Value,
    /// SANs on the certificate.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub san: Vec<String>,
    /// Validation status.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub validation_status: String,
}

/// Two-factor authentication settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DualFactorSettings {
    /// Specific users.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub specific_users: Vec<Value>,
    /// Enabled.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub enabled: bool,
    /// Protected areas.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub custom_areas: Vec<Value>,
    /// Area exceptions.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub custom_areas_exceptions: Vec<Value>,
    /// Allow all users.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub allow_all_users: bool,
    /// Suggest applications (the service spells it this way).
    #[serde(rename = "shouldSuggestApplicatons", deserialize_with = "deserialize_nullable")]
    pub should_suggest_applications: bool,
    /// Allowed media.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub allowed_media: Vec<String>,
    /// Send login notifications.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub should_send_login_notifications: bool,
    /// Settings version.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub version: i64,
}

/// Login protect settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoginProtect {
    /// Enabled.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub enabled: bool,
    /// Specific users.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub specific_users_list: Vec<Value>,
    /// Send notifications.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub send_lp_notifications: bool,
    /// Allow all users.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub allow_all_users: bool,
    /// Authentication methods.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub authentication_methods: Vec<String>,
    /// Protected URLs.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub urls: Vec<Value>,
    /// URL patterns.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub url_patterns: Vec<Value>,
}

/// Caching and content optimisation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct PerformanceConfiguration {
    /// Advanced caching rules.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub advanced_caching_rules: AdvancedCachingRules,
    /// Acceleration level.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub acceleration_level: String,
    /// Async validation.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub async_validation: bool,
    /// Minify JavaScript.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub minify_javascript: bool,
    /// Minify CSS.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub minify_css: bool,
    /// Minify static HTML.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub minify_static_html: bool,
    /// Compress JPEG.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub compress_jpeg: bool,
    /// Compress JPEG, legacy misspelled key.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub compress_jepg: bool,
    /// Progressive image rendering.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub progressive_image_rendering: bool,
    /// Aggressive compression.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub aggressive_compression: bool,
    /// Compress PNG.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub compress_png: bool,
    /// On-the-fly compression.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub on_the_fly_compression: bool,
    /// TCP pre-pooling.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub tcp_pre_pooling: bool,
    /// Comply with no-cache.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub comply_no_cache: bool,
    /// Comply with Vary.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub comply_vary: bool,
    /// Use shortest caching.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub use_shortest_caching: bool,
    /// Prefer last modified, legacy misspelled key.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub perfer_last_modified: bool,
    /// Prefer last modified.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub prefer_last_modified: bool,
    /// Disable client-side caching.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub disable_client_side_caching: bool,
    /// Cache 300x responses.
    #[serde(rename = "cache300x", deserialize_with = "deserialize_nullable")]
    pub cache_300x: bool,
    /// Cached headers.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub cache_headers: Vec<Value>,
}

/// Advanced caching rule lists.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AdvancedCachingRules {
    /// Never cache.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub never_cache_resources: Vec<Value>,
    /// Always cache.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub always_cache_resources: Vec<Value>,
}

/// Debug details attached to a response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DebugInfo {
    /// Id info.
    #[serde(rename = "id-info", deserialize_with = "deserialize_nullable")]
    pub id_info: String,
}

/// Answer of `certificates-ui/v3/certificates`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CertificateCheckResponse {
    /// Certificates of the site.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub data: Vec<CertificateData>,
}

impl CertificateCheckResponse {
    /// Whether any SAN has moved past `PENDING_USER_ACTION`, i.e. an existing
    /// certificate already covers the site.
    #[must_use]
    pub fn has_active_san(&self) -> bool {
        self.data
            .iter()
            .flat_map(|item| item.sans.iter())
            .any(|san| san.status != SAN_PENDING_USER_ACTION)
    }
}

/// One certificate.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct CertificateData {
    /// SAN entries.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub sans: Vec<San>,
}

/// Subject alternative name and its validation status.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct San {
    /// Validation status.
    #[serde(deserialize_with = "deserialize_nullable")]
    pub status: String,
}

// The service sends `null` for empty values as readily as it omits them.
fn deserialize_nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let option = Option::<T>::deserialize(deserializer)?;
    Ok(option.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn add_site_form_omits_unset_account() {
        let form = AddSiteRequest::new("example.com")
            .with_sans(true, false)
            .to_form();

        assert!(form.contains(&("domain", "example.com".into())));
        assert!(form.contains(&("naked_domain_san", "true".into())));
        assert!(form.contains(&("wildcard_san", "false".into())));
        assert!(form.contains(&("ref_id", String::new())));
        assert!(!form.iter().any(|(k, _)| *k == "account_id"));
    }

    #[test]
    fn add_site_form_omits_zero_account() {
        let form = AddSiteRequest::new("example.com")
            .with_account_id(AccountId::new(0))
            .to_form();
        assert!(!form.iter().any(|(k, _)| *k == "account_id"));

        let form = AddSiteRequest::new("example.com")
            .with_account_id(AccountId::new(77))
            .to_form();
        assert!(form.contains(&("account_id", "77".into())));
    }

    #[test]
    fn add_site_form_renders_optional_flags() {
        let request = AddSiteRequest {
            send_site_setup_emails: Some(false),
            force_ssl: Some(true),
            site_ip: Some("10.0.0.1".into()),
            ..AddSiteRequest::new("example.com")
        };
        let form = request.to_form();
        assert!(form.contains(&("send_site_setup_emails", "false".into())));
        assert!(form.contains(&("force_ssl", "true".into())));
        assert!(form.contains(&("site_ip", "10.0.0.1".into())));
    }

    #[test]
    fn status_decodes_sparse_payload() {
        let status: SiteStatusResponse = serde_json::from_value(json!({
            "site_id": 123,
            "domain": "www.example.com",
            "res": "0"
        }))
        .unwrap();

        assert_eq!(status.site_id, SiteId::new(123));
        assert!(status.res.is_success());
        assert!(status.dns.is_empty());
        assert!(status.created_at().is_none());
    }

    #[test]
    fn status_treats_null_fields_as_empty() {
        let status: SiteStatusResponse =
            serde_json::from_str(r#"{"site_id":1,"res":0,"ref_id":null,"ips":null}"#).unwrap();
        assert_eq!(status.site_id, SiteId::new(1));
        assert!(status.ref_id.is_empty());
        assert!(status.ips.is_empty());

        let status: SiteStatusResponse = serde_json::from_value(json!({
            "res": "9413",
            "exception_id": "abc",
            "security": null,
            "ssl": {"generated_certificate": {"san": null}}
        }))
        .unwrap();
        assert_eq!(status.exception_id, "abc");
        assert!(!status.res.is_success());
    }

    #[test]
    fn status_rejects_null_result_code() {
        let result = serde_json::from_str::<SiteStatusResponse>(r#"{"site_id":1,"res":null}"#);
        assert!(result.is_err());
    }

    #[test]
    fn status_created_at_from_millis() {
        let status = SiteStatusResponse {
            site_creation_date: 1_600_000_000_000,
            ..SiteStatusResponse::default()
        };
        assert_eq!(status.created_at().unwrap().timestamp(), 1_600_000_000);
    }

    #[test]
    fn dns_validation_records_only_for_dns_payloads() {
        let mut status = SiteStatusResponse::default();
        status.ssl.generated_certificate.validation_data = json!([{
            "dns_record_name": "_acme.example.com",
            "set_type_to": "TXT",
            "set_data_to": ["token"]
        }]);
        assert_eq!(status.dns_validation_records().len(), 1);

        status.ssl.generated_certificate.validation_data = json!({"html": "x"});
        assert!(status.dns_validation_records().is_empty());
    }

    #[test]
    fn certificate_check_detects_active_san() {
        let pending: CertificateCheckResponse = serde_json::from_value(json!({
            "data": [{"sans": [{"status": "PENDING_USER_ACTION"}]}]
        }))
        .unwrap();
        assert!(!pending.has_active_san());

        let active: CertificateCheckResponse = serde_json::from_value(json!({
            "data": [
                {"sans": [{"status": "PENDING_USER_ACTION"}]},
                {"sans": [{"status": "VALIDATED"}]}
            ]
        }))
        .unwrap();
        assert!(active.has_active_san());

        assert!(!CertificateCheckResponse::default().has_active_san());
    }
}
