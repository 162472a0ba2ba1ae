//! SLO annotations: markers such as deployments or maintenance windows.
//!
//! All calls go to `/api/annotations` with the `Project` header and the
//! versioned `Accept: application/json; version=v1alpha` header.
//!
//! # Example
//!
//! ```rust,ignore
//! use nobl9_api::annotations::{AnnotationQuery, AnnotationSpec, AnnotationsClient};
//!
//! let annotations = AnnotationsClient::new(&client);
//! let spec = AnnotationSpec::new("software-slo", "prod-latency", "Deployed v1.2.3");
//! annotations.create("deploy-v1.2.3", &spec).await?;
//!
//! let found = annotations
//!     .list("software-slo", &AnnotationQuery::new().slo("prod-latency"))
//!     .await?;
//! annotations.delete("software-slo", "deploy-v1.2.3").await?;
//! ```

mod types;

pub use types::{AnnotationQuery, AnnotationSpec, DEFAULT_ANNOTATION_MINUTES};

use serde_json::Value;

use crate::clients::{
    json_body, ApiError, ApiRoot, HttpMethod, HttpRequest, HttpRequestBuilder, Nobl9Client,
};
use crate::slo::SloClient;
use types::NamedAnnotation;

/// `Accept` header value the annotations API requires.
pub const ANNOTATIONS_ACCEPT: &str = "application/json; version=v1alpha";

/// Result of annotating one SLO in [`AnnotationsClient::create_for_project`].
#[derive(Debug)]
pub struct AnnotationOutcome {
    /// The annotated SLO.
    pub slo: String,
    /// The annotation name used for it.
    pub name: String,
    /// The API response or the failure for this SLO.
    pub result: Result<Value, ApiError>,
}

/// Annotation operations on top of a [`Nobl9Client`].
#[derive(Clone, Copy, Debug)]
pub struct AnnotationsClient<'a> {
    client: &'a Nobl9Client,
}

impl<'a> AnnotationsClient<'a> {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: &'a Nobl9Client) -> Self {
        Self { client }
    }

    /// `POST /api/annotations`: creates annotation `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Api`] with code 409 if the name is taken,
    /// [`ApiError::NotFound`] if the SLO does not exist, or [`ApiError`] if
    /// the call otherwise fails.
    pub async fn create(&self, name: &str, spec: &AnnotationSpec) -> Result<Value, ApiError> {
        let body = json_body(&NamedAnnotation { name, spec })?;
        let request = annotations_request(HttpMethod::Post, "/annotations", &spec.project)
            .body(body)
            .build()?;
        self.client.request(request).await
    }

    /// `GET /api/annotations` in `project`, filtered by `query`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn list(&self, project: &str, query: &AnnotationQuery) -> Result<Value, ApiError> {
        let mut builder = annotations_request(HttpMethod::Get, "/annotations", project);
        for (key, value) in query.to_params() {
            builder = builder.query_param(key, value);
        }
        self.client.request(builder.build()?).await
    }

    /// `DELETE /api/annotations/{name}`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn delete(&self, project: &str, name: &str) -> Result<(), ApiError> {
        let request = annotations_request(HttpMethod::Delete, &annotation_path(name), project)
            .build()?;
        self.client.request(request).await?;
        Ok(())
    }

    /// `PUT /api/annotations/{name}`: creates or replaces annotation `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] if the call fails.
    pub async fn upsert(&self, name: &str, spec: &AnnotationSpec) -> Result<Value, ApiError> {
        let request =
            annotations_request(HttpMethod::Put, &annotation_path(name), &spec.project)
                .body(json_body(spec)?)
                .build()?;
        self.client.request(request).await
    }

    /// Annotates every SLO in `spec.project`, ignoring `spec.slo`.
    ///
    /// With more than one SLO each annotation is named `{name}-{slo}`. One
    /// failed create does not stop the others; each outcome is reported.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError`] only if the SLOs cannot be listed.
    pub async fn create_for_project(
        &self,
        name: &str,
        spec: &AnnotationSpec,
    ) -> Result<Vec<AnnotationOutcome>, ApiError> {
        let slos = SloClient::new(self.client).names(&spec.project).await?;
        if slos.is_empty() {
            tracing::warn!("No SLOs found in project {}", spec.project);
        }

        let mut outcomes = Vec::with_capacity(slos.len());
        for slo in &slos {
            let annotation_name = if slos.len() > 1 {
                format!("{name}-{slo}")
            } else {
                name.to_string()
            };
            let result = self.create(&annotation_name, &spec.for_slo(slo)).await;
            if let Err(e) = &result {
                tracing::warn!("Failed to annotate SLO {}: {}", slo, e);
            }
            outcomes.push(AnnotationOutcome {
                slo: slo.clone(),
                name: annotation_name,
                result,
            });
        }
        Ok(outcomes)
    }
}

fn annotations_request(method: HttpMethod, path: &str, project: &str) -> HttpRequestBuilder {
    HttpRequest::builder(method, path)
        .api_root(ApiRoot::Api)
        .project(project)
        .header("Accept", ANNOTATIONS_ACCEPT)
}

fn annotation_path(name: &str) -> String {
    format!("/annotations/{}", urlencoding::encode(name))
}
