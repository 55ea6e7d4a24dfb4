//! Async HTTP client wrapping the tutela JSON API.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use reqwest::{Client, Response};
use serde::{Deserialize, Serialize};
use tutela_core::{
  grades::UnitGrades,
  program::Program,
  record::{EnrollmentRecord, RecordOverview},
  risk::{RiskAssociation, RiskCategory, RiskFactor},
  student::{Student, StudentProfile},
  subject::Subject,
};
use uuid::Uuid;

/// Body sent to `POST /enrollments`; mirrors the server's `SubmissionBody`.
#[derive(Debug, Serialize)]
pub struct SubmissionRequest {
  pub student:    StudentProfile,
  pub subject_id: Uuid,
  pub semester:   u32,
  pub grades:     UnitGrades,
  pub attendance: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct SubmissionResponse {
  pub student: Student,
  pub record:  EnrollmentRecord,
}

#[derive(Debug, Deserialize)]
pub struct FactorAttachment {
  pub factor:      RiskFactor,
  pub association: RiskAssociation,
}

#[derive(Deserialize)]
struct ErrorBody {
  error: String,
}

/// Async HTTP client for the tutela JSON REST API.
///
/// Cheap to clone — the inner [`reqwest::Client`] is `Arc`-based.
#[derive(Clone)]
pub struct ApiClient {
  client:   Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: impl Into<String>) -> Result<Self> {
    let client = Client::builder()
      .timeout(Duration::from_secs(30))
      .build()
      .context("failed to build HTTP client")?;
    Ok(Self { client, base_url: base_url.into() })
  }

  fn url(&self, path: &str) -> String {
    format!("{}/api{}", self.base_url.trim_end_matches('/'), path)
  }

  /// Pass through a successful response; otherwise surface the server's
  /// `{"error": ...}` message.
  async fn check(resp: Response, context: &str) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
      return Ok(resp);
    }
    match resp.json::<ErrorBody>().await {
      Ok(body) => Err(anyhow!("{context} → {status}: {}", body.error)),
      Err(_) => Err(anyhow!("{context} → {status}")),
    }
  }

  // ── Records ───────────────────────────────────────────────────────────────

  /// `GET /api/records[?status=<s>]`
  pub async fn list_records(&self, status: Option<&str>) -> Result<Vec<RecordOverview>> {
    let mut req = self.client.get(self.url("/records"));
    if let Some(s) = status {
      req = req.query(&[("status", s)]);
    }
    let resp = req.send().await.context("GET /records failed")?;
    Self::check(resp, "GET /records")
      .await?
      .json()
      .await
      .context("deserialising records")
  }

  /// `GET /api/records/reconciliation`
  pub async fn reconciliation(&self) -> Result<Vec<RecordOverview>> {
    let resp = self
      .client
      .get(self.url("/records/reconciliation"))
      .send()
      .await
      .context("GET /records/reconciliation failed")?;
    Self::check(resp, "GET /records/reconciliation")
      .await?
      .json()
      .await
      .context("deserialising records")
  }

  /// `POST /api/enrollments`
  pub async fn submit(&self, request: &SubmissionRequest) -> Result<SubmissionResponse> {
    let resp = self
      .client
      .post(self.url("/enrollments"))
      .json(request)
      .send()
      .await
      .context("POST /enrollments failed")?;
    Self::check(resp, "POST /enrollments")
      .await?
      .json()
      .await
      .context("deserialising submission response")
  }

  /// `POST /api/records/:id/withdraw`
  pub async fn withdraw(
    &self,
    record_id: Uuid,
    category_id: Uuid,
    notes: Option<String>,
  ) -> Result<FactorAttachment> {
    let resp = self
      .client
      .post(self.url(&format!("/records/{record_id}/withdraw")))
      .json(&serde_json::json!({ "category_id": category_id, "notes": notes }))
      .send()
      .await
      .context("POST /records/:id/withdraw failed")?;
    Self::check(resp, "POST /records/:id/withdraw")
      .await?
      .json()
      .await
      .context("deserialising withdrawal response")
  }

  // ── Risk factors ──────────────────────────────────────────────────────────

  /// `GET /api/records/:id/risk-factors`
  pub async fn list_associations(&self, record_id: Uuid) -> Result<Vec<RiskAssociation>> {
    let resp = self
      .client
      .get(self.url(&format!("/records/{record_id}/risk-factors")))
      .send()
      .await
      .context("GET /records/:id/risk-factors failed")?;
    Self::check(resp, "GET /records/:id/risk-factors")
      .await?
      .json()
      .await
      .context("deserialising associations")
  }

  /// `POST /api/records/:id/risk-factors`
  pub async fn attach_risk(
    &self,
    record_id: Uuid,
    category_id: Uuid,
    severity: &str,
    notes: Option<String>,
  ) -> Result<FactorAttachment> {
    let resp = self
      .client
      .post(self.url(&format!("/records/{record_id}/risk-factors")))
      .json(&serde_json::json!({
        "category_id": category_id,
        "severity": severity,
        "notes": notes,
      }))
      .send()
      .await
      .context("POST /records/:id/risk-factors failed")?;
    Self::check(resp, "POST /records/:id/risk-factors")
      .await?
      .json()
      .await
      .context("deserialising attachment response")
  }

  /// `GET /api/risk-categories`
  pub async fn list_categories(&self) -> Result<Vec<RiskCategory>> {
    let resp = self
      .client
      .get(self.url("/risk-categories"))
      .send()
      .await
      .context("GET /risk-categories failed")?;
    Self::check(resp, "GET /risk-categories")
      .await?
      .json()
      .await
      .context("deserialising categories")
  }

  /// `POST /api/risk-categories`
  pub async fn add_category(
    &self,
    name: &str,
    description: Option<String>,
  ) -> Result<RiskCategory> {
    let resp = self
      .client
      .post(self.url("/risk-categories"))
      .json(&serde_json::json!({ "name": name, "description": description }))
      .send()
      .await
      .context("POST /risk-categories failed")?;
    Self::check(resp, "POST /risk-categories")
      .await?
      .json()
      .await
      .context("deserialising category")
  }

  /// `DELETE /api/risk-categories/:id`
  pub async fn delete_category(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/risk-categories/{id}")))
      .send()
      .await
      .context("DELETE /risk-categories/:id failed")?;
    Self::check(resp, "DELETE /risk-categories/:id").await?;
    Ok(())
  }

  // ── Students ──────────────────────────────────────────────────────────────

  /// `GET /api/students/lookup?control_number=<n>`
  pub async fn lookup_student(&self, control_number: &str) -> Result<Student> {
    let resp = self
      .client
      .get(self.url("/students/lookup"))
      .query(&[("control_number", control_number)])
      .send()
      .await
      .context("GET /students/lookup failed")?;
    Self::check(resp, "GET /students/lookup")
      .await?
      .json()
      .await
      .context("deserialising student")
  }

  // ── Reference data ────────────────────────────────────────────────────────

  /// `GET /api/programs`
  pub async fn list_programs(&self) -> Result<Vec<Program>> {
    let resp = self
      .client
      .get(self.url("/programs"))
      .send()
      .await
      .context("GET /programs failed")?;
    Self::check(resp, "GET /programs")
      .await?
      .json()
      .await
      .context("deserialising programs")
  }

  /// `POST /api/programs`
  pub async fn add_program(&self, name: &str, code: Option<String>) -> Result<Program> {
    let resp = self
      .client
      .post(self.url("/programs"))
      .json(&serde_json::json!({ "name": name, "code": code }))
      .send()
      .await
      .context("POST /programs failed")?;
    Self::check(resp, "POST /programs")
      .await?
      .json()
      .await
      .context("deserialising program")
  }

  /// `DELETE /api/programs/:id`
  pub async fn delete_program(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/programs/{id}")))
      .send()
      .await
      .context("DELETE /programs/:id failed")?;
    Self::check(resp, "DELETE /programs/:id").await?;
    Ok(())
  }

  /// `GET /api/subjects[?program_id=<uuid>]`
  pub async fn list_subjects(&self, program: Option<Uuid>) -> Result<Vec<Subject>> {
    let mut req = self.client.get(self.url("/subjects"));
    if let Some(p) = program {
      req = req.query(&[("program_id", p.to_string())]);
    }
    let resp = req.send().await.context("GET /subjects failed")?;
    Self::check(resp, "GET /subjects")
      .await?
      .json()
      .await
      .context("deserialising subjects")
  }

  /// `POST /api/subjects`
  pub async fn add_subject(
    &self,
    name: &str,
    code: Option<String>,
    semester: u32,
    program: Option<Uuid>,
  ) -> Result<Subject> {
    let resp = self
      .client
      .post(self.url("/subjects"))
      .json(&serde_json::json!({
        "name": name,
        "code": code,
        "semester": semester,
        "program_id": program,
      }))
      .send()
      .await
      .context("POST /subjects failed")?;
    Self::check(resp, "POST /subjects")
      .await?
      .json()
      .await
      .context("deserialising subject")
  }

  /// `DELETE /api/subjects/:id`
  pub async fn delete_subject(&self, id: Uuid) -> Result<()> {
    let resp = self
      .client
      .delete(self.url(&format!("/subjects/{id}")))
      .send()
      .await
      .context("DELETE /subjects/:id failed")?;
    Self::check(resp, "DELETE /subjects/:id").await?;
    Ok(())
  }
}
