// app/src/services/lead_intake.rs

//! "Get In Touch" submissions. Nothing is stored or sent: a valid lead is logged after a fixed
//! artificial delay and acknowledged.

use launchcraft::{LeadForm, Notice, Result};
use std::time::Duration;
use tracing::{info, instrument};

#[instrument(name = "lead_intake::submit", skip(form, delay), err(Display))]
pub async fn submit_lead(form: LeadForm, delay: Duration) -> Result<Notice> {
  // Validation happens before the simulated submission starts.
  let lead = form.validate()?;

  tokio::time::sleep(delay).await;

  info!(
    email = %lead.email,
    company = lead.company.as_deref().unwrap_or("-"),
    service = lead.service.map(|s| s.as_str()).unwrap_or("-"),
    budget = lead.budget.map(|b| b.as_str()).unwrap_or("-"),
    timeline = lead.timeline.map(|t| t.as_str()).unwrap_or("-"),
    "Lead received."
  );
  Ok(Notice::success(
    "Message sent!",
    "We'll get back to you within 24 hours.",
  ))
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Instant;

  fn form() -> LeadForm {
    LeadForm {
      name: "Ada".to_string(),
      email: "ada@example.com".to_string(),
      service: Some("mvp".to_string()),
      message: "Looking for an MVP partner.".to_string(),
      ..Default::default()
    }
  }

  #[actix_rt::test]
  async fn accepted_leads_wait_for_the_delay() {
    let started = Instant::now();
    let notice = submit_lead(form(), Duration::from_millis(30)).await.unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
    assert_eq!(notice.title, "Message sent!");
    assert!(!notice.is_failure());
  }

  #[actix_rt::test]
  async fn invalid_leads_fail_without_waiting() {
    let started = Instant::now();
    let broken = LeadForm {
      message: "  ".to_string(),
      ..form()
    };
    assert!(submit_lead(broken, Duration::from_secs(5)).await.is_err());
    assert!(started.elapsed() < Duration::from_secs(5));
  }
}
