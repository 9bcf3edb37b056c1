//! Bounded object listing for arbitrary resource types

use async_trait::async_trait;
use kindscan_core::{ListError, ResourceCandidate};
use kube::{
    Client,
    api::{Api, ApiResource, DynamicObject, ListParams},
};

/// Lists objects of one resource type in a namespace
///
/// Returns how many objects came back (at most `limit`), or a typed failure.
#[async_trait]
pub trait ObjectLister: Send + Sync {
    async fn list(
        &self,
        candidate: &ResourceCandidate,
        namespace: &str,
        limit: u32,
    ) -> std::result::Result<usize, ListError>;
}

/// Lister backed by the dynamic API
pub struct DynamicLister {
    client: Client,
}

impl DynamicLister {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

/// Build the dynamic API coordinates for a candidate
pub fn api_resource(candidate: &ResourceCandidate) -> ApiResource {
    ApiResource {
        group: candidate.group.clone(),
        version: candidate.version.clone(),
        api_version: candidate.group_version.clone(),
        kind: candidate.kind.clone(),
        plural: candidate.plural_name.clone(),
    }
}

#[async_trait]
impl ObjectLister for DynamicLister {
    async fn list(
        &self,
        candidate: &ResourceCandidate,
        namespace: &str,
        limit: u32,
    ) -> std::result::Result<usize, ListError> {
        let ar = api_resource(candidate);
        let api: Api<DynamicObject> = Api::namespaced_with(self.client.clone(), namespace, &ar);

        api.list(&ListParams::default().limit(limit))
            .await
            .map(|list| list.items.len())
            .map_err(list_error_from_kube)
    }
}

/// Map a kube client error to a list failure
///
/// The status `reason` wins; the HTTP code is the fallback when the server
/// sent an unknown reason.
pub fn list_error_from_kube(err: kube::Error) -> ListError {
    match err {
        kube::Error::Api(resp) => match (resp.reason.as_str(), resp.code) {
            ("Forbidden", _) | (_, 403) => ListError::Forbidden(resp.message),
            ("MethodNotAllowed", _) | (_, 405) => ListError::MethodNotSupported(resp.message),
            ("NotFound", _) | (_, 404) => ListError::NotFound(resp.message),
            _ => ListError::Other(format!("{} ({}): {}", resp.reason, resp.code, resp.message)),
        },
        other => ListError::Other(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindscan_core::{DiscoveredResource, GroupVersion};
    use kube::core::ErrorResponse;

    fn api_error(code: u16, reason: &str) -> kube::Error {
        kube::Error::Api(ErrorResponse {
            status: "Failure".to_string(),
            message: format!("{reason} message"),
            reason: reason.to_string(),
            code,
        })
    }

    #[test]
    fn test_forbidden() {
        assert_eq!(
            list_error_from_kube(api_error(403, "Forbidden")),
            ListError::Forbidden("Forbidden message".to_string())
        );
    }

    #[test]
    fn test_method_not_allowed() {
        assert!(matches!(
            list_error_from_kube(api_error(405, "MethodNotAllowed")),
            ListError::MethodNotSupported(_)
        ));
    }

    #[test]
    fn test_not_found() {
        assert!(matches!(
            list_error_from_kube(api_error(404, "NotFound")),
            ListError::NotFound(_)
        ));
    }

    #[test]
    fn test_code_fallback_for_unknown_reason() {
        assert!(matches!(
            list_error_from_kube(api_error(403, "")),
            ListError::Forbidden(_)
        ));
        assert!(matches!(
            list_error_from_kube(api_error(404, "")),
            ListError::NotFound(_)
        ));
    }

    #[test]
    fn test_server_errors_are_other() {
        let err = list_error_from_kube(api_error(503, "ServiceUnavailable"));
        assert_eq!(
            err,
            ListError::Other("ServiceUnavailable (503): ServiceUnavailable message".to_string())
        );
        assert!(matches!(
            list_error_from_kube(api_error(500, "InternalError")),
            ListError::Other(_)
        ));
    }

    #[test]
    fn test_api_resource_coordinates() {
        let candidate = ResourceCandidate::from_discovery(
            &GroupVersion::parse("batch/v1").unwrap(),
            &DiscoveredResource::new("cronjobs", "CronJob", true, &["list"]),
        );
        let ar = api_resource(&candidate);
        assert_eq!(ar.group, "batch");
        assert_eq!(ar.version, "v1");
        assert_eq!(ar.api_version, "batch/v1");
        assert_eq!(ar.kind, "CronJob");
        assert_eq!(ar.plural, "cronjobs");
    }
}
