//! YAML seed files describing one product with its avatars, campaigns,
//! draft content and tracked links. Used for local development and demos.

use std::collections::HashSet;
use std::path::Path;

use serde::Deserialize;

use crate::campaigns::ChannelCategory;
use crate::content::{ContentFormat, EngagementCounts, Rating};
use crate::ConfigError;

#[derive(Debug, Clone, Deserialize)]
pub struct SeedFile {
    pub product: SeedProduct,
    #[serde(default)]
    pub avatars: Vec<SeedAvatar>,
    #[serde(default)]
    pub campaigns: Vec<SeedCampaign>,
    #[serde(default)]
    pub content: Vec<SeedContent>,
    #[serde(default)]
    pub links: Vec<SeedLink>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedProduct {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedAvatar {
    /// Seed-local reference used by campaigns.
    pub key: String,
    pub name: String,
    #[serde(default)]
    pub pain_points: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedCampaign {
    pub key: String,
    pub avatar: String,
    pub angle: String,
    pub channel: String,
    pub hook: String,
    pub content_type: ContentFormat,
    pub category: ChannelCategory,
    pub destination_url: Option<String>,
}

/// Seeded content always starts as a draft, exactly like generated content.
#[derive(Debug, Clone, Deserialize)]
pub struct SeedContent {
    pub key: Option<String>,
    pub campaign: Option<String>,
    #[serde(rename = "type")]
    pub format: ContentFormat,
    pub title: String,
    pub body: String,
    pub rating: Option<Rating>,
    #[serde(default)]
    pub engagement: EngagementCounts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SeedLink {
    pub slug: String,
    pub destination_url: String,
    pub campaign: Option<String>,
    pub content: Option<String>,
    #[serde(default)]
    pub click_count: u32,
}

/// Load and validate a seed file from YAML.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_seed(path: &Path) -> Result<SeedFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::SeedFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_seed(&content)
}

/// Parse and validate seed YAML held in memory.
///
/// # Errors
///
/// Returns `ConfigError` if the YAML is malformed or fails validation.
pub fn parse_seed(yaml: &str) -> Result<SeedFile, ConfigError> {
    let seed: SeedFile = serde_yaml::from_str(yaml).map_err(ConfigError::SeedFileParse)?;
    validate_seed(&seed)?;
    Ok(seed)
}

fn validate_seed(seed: &SeedFile) -> Result<(), ConfigError> {
    if seed.product.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "product name must be non-empty".to_string(),
        ));
    }

    let avatar_keys = unique_keys("avatar", seed.avatars.iter().map(|a| a.key.as_str()))?;
    for avatar in &seed.avatars {
        if avatar.name.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "avatar '{}' has an empty name",
                avatar.key
            )));
        }
    }

    let campaign_keys = unique_keys("campaign", seed.campaigns.iter().map(|c| c.key.as_str()))?;
    for campaign in &seed.campaigns {
        if !avatar_keys.contains(campaign.avatar.as_str()) {
            return Err(ConfigError::Validation(format!(
                "campaign '{}' references unknown avatar '{}'",
                campaign.key, campaign.avatar
            )));
        }
        if campaign.channel.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "campaign '{}' has an empty channel",
                campaign.key
            )));
        }
    }

    let content_keys = unique_keys(
        "content",
        seed.content.iter().filter_map(|c| c.key.as_deref()),
    )?;
    for piece in &seed.content {
        if piece.title.trim().is_empty() {
            return Err(ConfigError::Validation(
                "content title must be non-empty".to_string(),
            ));
        }
        if let Some(ref campaign) = piece.campaign {
            if !campaign_keys.contains(campaign.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "content '{}' references unknown campaign '{campaign}'",
                    piece.title
                )));
            }
        }
    }

    unique_keys("link slug", seed.links.iter().map(|l| l.slug.as_str()))?;
    for link in &seed.links {
        if link.campaign.is_none() && link.content.is_none() {
            return Err(ConfigError::Validation(format!(
                "link '{}' must reference a campaign or a content piece",
                link.slug
            )));
        }
        if let Some(ref campaign) = link.campaign {
            if !campaign_keys.contains(campaign.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "link '{}' references unknown campaign '{campaign}'",
                    link.slug
                )));
            }
        }
        if let Some(ref content) = link.content {
            if !content_keys.contains(content.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "link '{}' references unknown content '{content}'",
                    link.slug
                )));
            }
        }
    }

    Ok(())
}

fn unique_keys<'a>(
    what: &str,
    keys: impl Iterator<Item = &'a str>,
) -> Result<HashSet<&'a str>, ConfigError> {
    let mut seen = HashSet::new();
    for key in keys {
        if key.trim().is_empty() {
            return Err(ConfigError::Validation(format!("{what} key must be non-empty")));
        }
        if !seen.insert(key) {
            return Err(ConfigError::Validation(format!("duplicate {what} key: '{key}'")));
        }
    }
    Ok(seen)
}
