//! The content of a portfolio, as read from a JSON file.

use super::theme::Theme;
use crate::colour::Colour;
use crate::PDFError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

const SAMPLE: &str = include_str!("../../demos/portfolio.json");

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    #[serde(default)]
    pub document: DocumentSettings,
    #[serde(default)]
    pub theme: Theme,
    pub profile: Profile,
    #[serde(default)]
    pub overview: String,
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub showcase: Vec<Showcase>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<Contact>,
}

/// Output file name and document metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSettings {
    pub file_name: String,
    /// Defaults to "<name> Portfolio"
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keywords: Option<String>,
}

impl Default for DocumentSettings {
    fn default() -> Self {
        DocumentSettings {
            file_name: "Portfolio.pdf".to_string(),
            title: None,
            subject: None,
            keywords: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub name: String,
    pub title: String,
    /// Without a photo, a placeholder circle is drawn instead
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Certificate {
    pub title: String,
    pub subtitle: String,
    /// Accent bar colour, the palette accent when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colour: Option<Colour>,
    /// Verification link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub learned: String,
    /// A short glyph shown in a badge next to the title
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

/// A project screenshot with its caption
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Showcase {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<PathBuf>,
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    pub email: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub label: String,
    pub url: String,
}

impl Portfolio {
    /// The portfolio the generator was first written for
    pub fn sample() -> Result<Portfolio, PDFError> {
        Portfolio::from_json(SAMPLE)
    }

    /// Parse and validate a portfolio
    pub fn from_json(json: &str) -> Result<Portfolio, PDFError> {
        let portfolio: Portfolio = serde_json::from_str(json)?;
        portfolio.validate()?;
        Ok(portfolio)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Portfolio, PDFError> {
        let path = path.as_ref();
        log::debug!("reading portfolio from {:?}", path);
        Portfolio::from_json(&std::fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String, PDFError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn title(&self) -> String {
        self.document
            .title
            .clone()
            .unwrap_or_else(|| format!("{} Portfolio", self.profile.name))
    }

    /// Check the content invariants colours can't check at parse time.
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), PDFError> {
        non_empty("document.file_name", &self.document.file_name)?;
        non_empty("profile.name", &self.profile.name)?;

        for (i, skill) in self.skills.iter().enumerate() {
            non_empty(&format!("skills[{i}]"), skill)?;
        }

        for (i, certificate) in self.certificates.iter().enumerate() {
            non_empty(&format!("certificates[{i}].title"), &certificate.title)?;
            if let Some(url) = &certificate.url {
                valid_url(&format!("certificates[{i}].url"), url)?;
            }
        }

        for (i, project) in self.projects.iter().enumerate() {
            non_empty(&format!("projects[{i}].title"), &project.title)?;
            for (j, tag) in project.tags.iter().enumerate() {
                non_empty(&format!("projects[{i}].tags[{j}]"), tag)?;
            }
        }

        for (i, item) in self.showcase.iter().enumerate() {
            non_empty(&format!("showcase[{i}].caption"), &item.caption)?;
            if let Some(link) = &item.link {
                valid_url(&format!("showcase[{i}].link"), link)?;
            }
        }

        if let Some(contact) = &self.contact {
            non_empty("contact.email", &contact.email)?;
            for (i, link) in contact.links.iter().enumerate() {
                non_empty(&format!("contact.links[{i}].label"), &link.label)?;
                valid_url(&format!("contact.links[{i}].url"), &link.url)?;
            }
        }

        Ok(())
    }
}

fn invalid(field: &str, reason: impl Into<String>) -> PDFError {
    PDFError::InvalidContent {
        field: field.to_string(),
        reason: reason.into(),
    }
}

fn non_empty(field: &str, value: &str) -> Result<(), PDFError> {
    if value.trim().is_empty() {
        return Err(invalid(field, "cannot be empty or whitespace-only"));
    }
    Ok(())
}

fn valid_url(field: &str, value: &str) -> Result<(), PDFError> {
    match Url::parse(value) {
        Ok(url) => match url.scheme() {
            "http" | "https" | "mailto" => Ok(()),
            scheme => Err(invalid(field, format!("unsupported URL scheme: {scheme}"))),
        },
        Err(e) => Err(invalid(field, format!("invalid URL {value:?}: {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn minimal() -> Portfolio {
        Portfolio::from_json(r#"{ "profile": { "name": "Ada", "title": "Engineer" } }"#).unwrap()
    }

    fn field_of(error: PDFError) -> String {
        match error {
            PDFError::InvalidContent { field, .. } => field,
            other => panic!("expected invalid content, got {other:?}"),
        }
    }

    #[test]
    fn sample_is_valid() {
        let sample = Portfolio::sample().unwrap();
        assert_eq!(sample.profile.name, "Amritha Preetha Anil");
        assert_eq!(sample.skills, vec!["Research", "UI Design", "Prototyping"]);
        assert_eq!(sample.certificates.len(), 5);
        assert_eq!(sample.document.file_name, "Amritha_Portfolio.pdf");
    }

    #[test]
    fn sample_survives_serialization() {
        let sample = Portfolio::sample().unwrap();
        let reparsed = Portfolio::from_json(&sample.to_json().unwrap()).unwrap();
        assert_eq!(reparsed, sample);
    }

    #[test]
    fn everything_but_the_profile_is_optional() {
        let portfolio = minimal();
        assert_eq!(portfolio.document, DocumentSettings::default());
        assert!(portfolio.skills.is_empty());
        assert!(portfolio.contact.is_none());
        assert_eq!(portfolio.title(), "Ada Portfolio");
    }

    #[test]
    fn blank_skill_is_rejected() {
        let mut portfolio = minimal();
        portfolio.skills = vec!["Research".into(), "  ".into()];
        assert_eq!(field_of(portfolio.validate().unwrap_err()), "skills[1]");
    }

    #[test]
    fn relative_url_is_rejected() {
        let mut portfolio = minimal();
        portfolio.showcase.push(Showcase {
            image: None,
            caption: "Timer".into(),
            link: Some("github.com/someone".into()),
        });
        assert_eq!(field_of(portfolio.validate().unwrap_err()), "showcase[0].link");
    }

    #[test]
    fn unsupported_scheme_is_rejected() {
        let mut portfolio = minimal();
        portfolio.contact = Some(Contact {
            email: "ada@example.com".into(),
            location: String::new(),
            links: vec![Link {
                label: "Files".into(),
                url: "ftp://example.com/cv".into(),
            }],
        });
        assert_eq!(field_of(portfolio.validate().unwrap_err()), "contact.links[0].url");
    }

    #[test]
    fn mailto_links_are_allowed() {
        let mut portfolio = minimal();
        portfolio.certificates.push(Certificate {
            title: "Mail me".into(),
            subtitle: String::new(),
            colour: None,
            url: Some("mailto:ada@example.com".into()),
        });
        assert!(portfolio.validate().is_ok());
    }

    #[test]
    fn malformed_colour_fails_to_parse() {
        let json = r##"{
            "profile": { "name": "Ada", "title": "Engineer" },
            "certificates": [{ "title": "A", "subtitle": "B", "colour": "#12345" }]
        }"##;
        assert!(matches!(Portfolio::from_json(json), Err(PDFError::Json(_))));
    }
}
