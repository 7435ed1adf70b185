//! Service template executor
//!
//! Every service call runs the same state machine:
//! merge global config → validate → build request → send → parse response,
//! with any failure funneled once through the template's error path. The
//! steps are pluggable per service; callers may replace any subset for
//! customization or testing, unreplaced steps keep the service default.

use serde::Serialize;

use crate::config::{GlobalConfig, MergeGlobalDefaults};
use crate::error::{ErrorKind, ErrorNormalizer, ServiceError, ServiceName};
use crate::transport::{RawResponse, Transport, TransportFailure, WireRequest};
use crate::validate::{IssueCode, Schema, ValidationIssue, validate};

type ValidateFn<P> = Box<dyn Fn(&P) -> Result<(), Vec<ValidationIssue>> + Send + Sync>;
type BuildFn<P> = Box<dyn Fn(&P) -> Result<WireRequest, ErrorKind> + Send + Sync>;
type ParseFn<P, R> = Box<dyn Fn(RawResponse, &P) -> Result<R, ErrorKind> + Send + Sync>;
type ParseErrorFn = Box<dyn Fn(TransportFailure) -> ErrorKind + Send + Sync>;

/// The strategy object describing one service
///
/// Holds the pluggable validate/build/parse/parse-error steps; the send step
/// is the [`Transport`] passed to [`execute`].
pub struct ServiceTemplate<P, R> {
    service: ServiceName,
    validate: ValidateFn<P>,
    build: BuildFn<P>,
    parse: ParseFn<P, R>,
    parse_error: ParseErrorFn,
}

impl<P, R> std::fmt::Debug for ServiceTemplate<P, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceTemplate")
            .field("service", &self.service)
            .finish_non_exhaustive()
    }
}

impl<P, R> ServiceTemplate<P, R>
where
    P: Serialize,
{
    /// Assemble a service's default template
    ///
    /// The validate step applies `schema` to the serde_json projection of
    /// the merged parameters.
    pub fn new(
        service: ServiceName,
        schema: &'static Schema,
        build: impl Fn(&P) -> Result<WireRequest, ErrorKind> + Send + Sync + 'static,
        parse: impl Fn(RawResponse, &P) -> Result<R, ErrorKind> + Send + Sync + 'static,
        parse_error: ErrorNormalizer,
    ) -> Self {
        Self {
            service,
            validate: Box::new(move |params| {
                let projected = serde_json::to_value(params).map_err(|e| {
                    vec![ValidationIssue {
                        path: None,
                        code: IssueCode::Configuration,
                        message: format!("parameters are not serializable: {e}"),
                    }]
                })?;
                validate(&projected, schema)
            }),
            build: Box::new(build),
            parse: Box::new(parse),
            parse_error: Box::new(parse_error),
        }
    }
}

impl<P, R> ServiceTemplate<P, R> {
    /// The service this template belongs to
    #[must_use]
    pub const fn service(&self) -> ServiceName {
        self.service
    }

    /// Replace the validate step
    #[must_use]
    pub fn with_validate(
        mut self,
        validate: impl Fn(&P) -> Result<(), Vec<ValidationIssue>> + Send + Sync + 'static,
    ) -> Self {
        self.validate = Box::new(validate);
        self
    }

    /// Replace the request-builder step
    #[must_use]
    pub fn with_build(
        mut self,
        build: impl Fn(&P) -> Result<WireRequest, ErrorKind> + Send + Sync + 'static,
    ) -> Self {
        self.build = Box::new(build);
        self
    }

    /// Replace the response-parser step
    #[must_use]
    pub fn with_parse(
        mut self,
        parse: impl Fn(RawResponse, &P) -> Result<R, ErrorKind> + Send + Sync + 'static,
    ) -> Self {
        self.parse = Box::new(parse);
        self
    }

    /// Replace the error normalizer
    #[must_use]
    pub fn with_parse_error(
        mut self,
        parse_error: impl Fn(TransportFailure) -> ErrorKind + Send + Sync + 'static,
    ) -> Self {
        self.parse_error = Box::new(parse_error);
        self
    }
}

/// Run one service call through the template state machine
///
/// Stateless across calls; the only await point is the transport send.
///
/// # Errors
///
/// Any step's failure, normalized and tagged with the template's service
/// name.
pub async fn execute<P, R>(
    transport: &dyn Transport,
    config: &GlobalConfig,
    template: &ServiceTemplate<P, R>,
    mut params: P,
) -> Result<R, ServiceError>
where
    P: MergeGlobalDefaults,
{
    let service = template.service;
    let fail = |kind: ErrorKind| ServiceError { service, kind };

    params.merge_defaults(config);

    (template.validate)(&params).map_err(|issues| fail(ErrorKind::Validation(issues)))?;

    let request = (template.build)(&params).map_err(&fail)?;

    let response = match transport.send(&request).await {
        Ok(response) => response,
        Err(failure) => return Err(fail((template.parse_error)(failure))),
    };

    (template.parse)(response, &params).map_err(&fail)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use serde::Serialize;
    use serde_json::{Value, json};
    use url::Url;

    use super::*;
    use crate::config::CommonParams;
    use crate::error::normalize_default;
    use crate::validate::{FieldRule, Rule};

    static ECHO_SCHEMA: Schema = Schema {
        fields: &[FieldRule {
            path: "query",
            rule: Rule::Required,
        }],
    };

    #[derive(Debug, Clone, Serialize)]
    #[serde(rename_all = "camelCase")]
    struct EchoParams {
        #[serde(flatten)]
        common: CommonParams,
        query: String,
    }

    impl MergeGlobalDefaults for EchoParams {
        fn merge_defaults(&mut self, config: &GlobalConfig) {
            self.common.merge(config);
        }
    }

    /// Mock transport recording the last request and answering from a script
    struct MockTransport {
        sent: Mutex<Vec<WireRequest>>,
        result: Result<Value, u16>,
    }

    impl MockTransport {
        fn replying(body: Value) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                result: Ok(body),
            }
        }

        fn failing(status: u16) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                result: Err(status),
            }
        }

        fn sent_count(&self) -> usize {
            self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: &WireRequest) -> Result<RawResponse, TransportFailure> {
            if let Ok(mut sent) = self.sent.lock() {
                sent.push(request.clone());
            }
            match &self.result {
                Ok(body) => Ok(RawResponse {
                    status: 200,
                    body: body.clone(),
                }),
                Err(status) => Err(TransportFailure::Status {
                    status: *status,
                    data: Value::Null,
                    message: format!("HTTP {status}"),
                }),
            }
        }
    }

    fn echo_template() -> ServiceTemplate<EchoParams, Value> {
        ServiceTemplate::new(
            ServiceName::Geocode,
            &ECHO_SCHEMA,
            |params: &EchoParams| {
                let url = Url::parse(&format!(
                    "{}/echo/{}",
                    params.common.resolved_base_url().unwrap_or_default(),
                    params.query
                ))
                .map_err(|e| ErrorKind::Unexpected(e.to_string()))?;
                Ok(WireRequest::get(url))
            },
            |response, _params| Ok(response.body),
            normalize_default,
        )
    }

    fn params(query: &str) -> EchoParams {
        EchoParams {
            common: CommonParams::default(),
            query: query.to_string(),
        }
    }

    fn config() -> GlobalConfig {
        GlobalConfig {
            common_base_url: Some("https://api.example.com".to_string()),
            ..GlobalConfig::for_testing()
        }
    }

    #[tokio::test]
    async fn test_successful_call_runs_all_steps() {
        let transport = MockTransport::replying(json!({"ok": true}));
        let result = execute(&transport, &config(), &echo_template(), params("x"))
            .await
            .unwrap();
        assert_eq!(result, json!({"ok": true}));
        assert_eq!(transport.sent_count(), 1);
    }

    #[tokio::test]
    async fn test_global_config_merged_before_build() {
        let transport = MockTransport::replying(Value::Null);
        execute(&transport, &config(), &echo_template(), params("x"))
            .await
            .unwrap();
        let sent = transport.sent.lock().unwrap();
        // Base URL and key came from the global config, not the call params
        assert!(sent[0].url.as_str().starts_with("https://api.example.com"));
    }

    #[tokio::test]
    async fn test_validation_failure_skips_transport() {
        let transport = MockTransport::replying(Value::Null);
        let no_base = GlobalConfig::for_testing();
        let error = execute(&transport, &no_base, &echo_template(), params("x"))
            .await
            .unwrap_err();

        assert_eq!(error.service, ServiceName::Geocode);
        let issues = error.issues().unwrap_or_default();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].path.is_none());
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_http_error_is_normalized_with_service_tag() {
        let transport = MockTransport::failing(403);
        let error = execute(&transport, &config(), &echo_template(), params("x"))
            .await
            .unwrap_err();

        assert_eq!(error.service, ServiceName::Geocode);
        assert_eq!(error.status(), Some(403));
    }

    #[tokio::test]
    async fn test_parse_override_replaces_default() {
        let transport = MockTransport::replying(json!({"value": 7}));
        let template = echo_template()
            .with_parse(|response, _params| Ok(json!({"wrapped": response.body})));
        let result = execute(&transport, &config(), &template, params("x"))
            .await
            .unwrap();
        assert_eq!(result, json!({"wrapped": {"value": 7}}));
    }

    #[tokio::test]
    async fn test_validate_override_replaces_schema() {
        let transport = MockTransport::replying(Value::Null);
        let template = echo_template().with_validate(|params| {
            if params.query.is_empty() {
                Err(vec![ValidationIssue {
                    path: Some("query".to_string()),
                    code: IssueCode::Required,
                    message: "must not be empty".to_string(),
                }])
            } else {
                Ok(())
            }
        });
        let error = execute(&transport, &config(), &template, params(""))
            .await
            .unwrap_err();
        assert!(error.issues().is_some());
        assert_eq!(transport.sent_count(), 0);
    }

    #[tokio::test]
    async fn test_unexpected_build_error_keeps_message() {
        let transport = MockTransport::replying(Value::Null);
        let template = echo_template()
            .with_build(|_params| Err(ErrorKind::Unexpected("boom".to_string())));
        let error = execute(&transport, &config(), &template, params("x"))
            .await
            .unwrap_err();
        assert!(error.to_string().contains("boom"));
        assert_eq!(transport.sent_count(), 0);
    }
}
