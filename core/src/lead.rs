// core/src/lead.rs

//! Contact form ("Get In Touch") intake.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::models::wire_enum;

wire_enum! {
  pub enum ServiceInterest {
    Mvp => "mvp",
    Consulting => "consulting",
    Tools => "tools",
    Partnership => "partnership",
    Other => "other",
  }
}

wire_enum! {
  pub enum BudgetBracket {
    Under5k => "under-5k",
    From5kTo15k => "5k-15k",
    From15kTo50k => "15k-50k",
    From50kTo100k => "50k-100k",
    Over100k => "over-100k",
  }
}

wire_enum! {
  pub enum TimelineBracket {
    Asap => "asap",
    OneMonth => "1-month",
    ThreeMonths => "3-months",
    SixMonths => "6-months",
    Planning => "planning",
  }
}

/// The form as submitted. Empty strings in optional fields mean "not given".
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeadForm {
  #[serde(default)]
  pub name: String,
  #[serde(default)]
  pub email: String,
  pub company: Option<String>,
  pub service: Option<String>,
  pub budget: Option<String>,
  pub timeline: Option<String>,
  #[serde(default)]
  pub message: String,
}

/// A lead that passed validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
  pub name: String,
  pub email: String,
  pub company: Option<String>,
  pub service: Option<ServiceInterest>,
  pub budget: Option<BudgetBracket>,
  pub timeline: Option<TimelineBracket>,
  pub message: String,
}

fn required(value: &str, label: &str) -> Result<String> {
  let trimmed = value.trim();
  if trimmed.is_empty() {
    return Err(Error::validation(format!("{} is required.", label)));
  }
  Ok(trimmed.to_string())
}

fn optional_text(value: Option<String>) -> Option<String> {
  value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn optional_choice<T>(value: Option<&str>) -> Result<Option<T>>
where
  T: FromStr<Err = Error>,
{
  match value.map(str::trim) {
    None | Some("") => Ok(None),
    Some(raw) => raw.parse().map(Some),
  }
}

impl LeadForm {
  pub fn validate(self) -> Result<Lead> {
    let name = required(&self.name, "Full name")?;
    let email = required(&self.email, "Email")?;
    match email.split_once('@') {
      Some((local, domain)) if !local.is_empty() && !domain.is_empty() => {}
      _ => return Err(Error::validation("A valid email address is required.")),
    }
    let message = required(&self.message, "Project description")?;

    Ok(Lead {
      name,
      email,
      service: optional_choice(self.service.as_deref())?,
      budget: optional_choice(self.budget.as_deref())?,
      timeline: optional_choice(self.timeline.as_deref())?,
      company: optional_text(self.company),
      message,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn form() -> LeadForm {
    LeadForm {
      name: "Ada".to_string(),
      email: "ada@example.com".to_string(),
      message: "We need an MVP for a fintech idea.".to_string(),
      ..Default::default()
    }
  }

  #[test]
  fn minimal_form_is_accepted() {
    let lead = form().validate().unwrap();
    assert_eq!(lead.service, None);
    assert_eq!(lead.company, None);
  }

  #[test]
  fn mandatory_fields_are_enforced() {
    for broken in [
      LeadForm { name: "  ".into(), ..form() },
      LeadForm { email: String::new(), ..form() },
      LeadForm { email: "ada.example.com".into(), ..form() },
      LeadForm { message: String::new(), ..form() },
    ] {
      assert!(matches!(broken.validate(), Err(Error::Validation(_))));
    }
  }

  #[test]
  fn classification_hints_use_fixed_values() {
    let lead = LeadForm {
      company: Some(" Acme ".into()),
      service: Some("partnership".into()),
      budget: Some("15k-50k".into()),
      timeline: Some("".into()),
      ..form()
    }
    .validate()
    .unwrap();
    assert_eq!(lead.company.as_deref(), Some("Acme"));
    assert_eq!(lead.service, Some(ServiceInterest::Partnership));
    assert_eq!(lead.budget, Some(BudgetBracket::From15kTo50k));
    assert_eq!(lead.timeline, None);

    let rejected = LeadForm {
      budget: Some("a-lot".into()),
      ..form()
    };
    assert!(rejected.validate().is_err());
  }
}
