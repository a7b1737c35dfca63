//! Static page content.
//!
//! Supplied once at startup and never mutated. Entries have no identity
//! beyond their display order. Prose fields accept inline markdown
//! (`**strong**`, `*emphasis*`).

use serde::Deserialize;

use crate::{ContentError, PageMeta};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StaticContent {
    pub meta: PageMeta,
    pub profile: Profile,
    pub about: About,
    pub experience: Experience,
    pub education: Education,
    pub footer: Footer,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    pub name: String,
    /// Short mark shown in the header (initials).
    pub monogram: String,
    pub greeting: String,
    pub intro: String,
    #[serde(default)]
    pub links: Vec<Link>,
}

impl Profile {
    /// The outbound link opened by the navigation action.
    #[must_use]
    pub fn primary_link(&self) -> Option<&Link> {
        self.links.first()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Link {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct About {
    pub heading: String,
    pub paragraphs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Experience {
    pub heading: String,
    pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Role {
    pub title: String,
    pub organisation: String,
    pub period: String,
    pub summary: String,
    /// Highlighted as the current role.
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Education {
    pub heading: String,
    pub qualifications: Vec<Qualification>,
    #[serde(default)]
    pub badges: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Qualification {
    pub degree: String,
    pub institution: String,
    pub period: String,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Footer {
    pub message: String,
    pub copyright: String,
}

fn require(value: &str, field: &'static str) -> Result<(), ContentError> {
    if value.trim().is_empty() {
        Err(ContentError::MissingField(field))
    } else {
        Ok(())
    }
}

impl StaticContent {
    /// Check the invariants the renderer relies on.
    pub fn validate(&self) -> Result<(), ContentError> {
        self.meta.validate()?;

        require(&self.profile.name, "profile.name")?;
        require(&self.profile.monogram, "profile.monogram")?;
        require(&self.profile.greeting, "profile.greeting")?;
        for link in &self.profile.links {
            if !(link.url.starts_with("https://") || link.url.starts_with("http://")) {
                return Err(ContentError::InvalidLink {
                    label: link.label.clone(),
                });
            }
        }

        require(&self.about.heading, "about.heading")?;
        require(&self.experience.heading, "experience.heading")?;
        for (index, role) in self.experience.roles.iter().enumerate() {
            for (value, field) in [
                (&role.title, "title"),
                (&role.organisation, "organisation"),
                (&role.period, "period"),
            ] {
                if value.trim().is_empty() {
                    return Err(ContentError::EmptyRoleField { index, field });
                }
            }
        }

        require(&self.education.heading, "education.heading")?;
        for (index, qualification) in self.education.qualifications.iter().enumerate() {
            if qualification.degree.trim().is_empty() {
                return Err(ContentError::EmptyQualificationField {
                    index,
                    field: "degree",
                });
            }
            if qualification.institution.trim().is_empty() {
                return Err(ContentError::EmptyQualificationField {
                    index,
                    field: "institution",
                });
            }
        }
        Ok(())
    }

    /// The role flagged as current, if any.
    #[must_use]
    pub fn featured_role(&self) -> Option<&Role> {
        self.experience.roles.iter().find(|role| role.featured)
    }
}

#[cfg(test)]
mod tests {
    use super::StaticContent;
    use crate::ContentError;

    const MINIMAL: &str = r#"
        [meta]
        title = "Jo Doe - Portfolio"

        [profile]
        name = "Jo Doe"
        monogram = "JD"
        greeting = "Hi, I'm Jo"
        intro = "Working on **things**."
        links = [{ label = "LinkedIn", url = "https://example.com/jo" }]

        [about]
        heading = "About Me"
        paragraphs = ["One.", "Two."]

        [experience]
        heading = "Experience"

        [[experience.roles]]
        title = "Officer"
        organisation = "Org"
        period = "2024 - 2025"
        summary = "Did work."
        featured = true
        badges = ["Research"]

        [[experience.roles]]
        title = "Teacher"
        organisation = "School"
        period = "2023 - 2024"
        summary = "Taught."

        [education]
        heading = "Education"
        badges = ["R"]

        [[education.qualifications]]
        degree = "MPhil"
        institution = "Cambridge"
        period = "2022-2023"
        result = "Grade: 72"

        [footer]
        message = "Let's connect"
        copyright = "(c) Jo Doe"
    "#;

    fn minimal() -> StaticContent {
        toml::from_str(MINIMAL).expect("minimal content parses")
    }

    #[test]
    fn minimal_content_is_valid() {
        let content = minimal();
        content.validate().expect("valid");
        assert_eq!(content.experience.roles.len(), 2);
        assert!(!content.experience.roles[1].featured);
        assert!(content.experience.roles[1].badges.is_empty());
        assert_eq!(
            content.featured_role().map(|role| role.title.as_str()),
            Some("Officer")
        );
        assert_eq!(
            content.profile.primary_link().map(|link| link.label.as_str()),
            Some("LinkedIn")
        );
    }

    #[test]
    fn role_without_organisation_is_rejected() {
        let mut content = minimal();
        content.experience.roles[1].organisation = " ".into();
        assert!(matches!(
            content.validate(),
            Err(ContentError::EmptyRoleField {
                index: 1,
                field: "organisation"
            })
        ));
    }

    #[test]
    fn non_http_link_is_rejected() {
        let mut content = minimal();
        content.profile.links[0].url = "javascript:alert(1)".into();
        assert!(matches!(
            content.validate(),
            Err(ContentError::InvalidLink { .. })
        ));
    }

    #[test]
    fn unknown_fields_fail_to_parse() {
        let doc = MINIMAL.replace("[footer]", "[footer]\ncolour = \"teal\"");
        assert!(toml::from_str::<StaticContent>(&doc).is_err());
    }
}
