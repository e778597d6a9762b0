//! Click roll-ups per avatar, channel and campaign.
//!
//! Each level normalizes against its own maximum, so an avatar scoring 100
//! says nothing about whether its campaigns score 100.

use std::collections::HashMap;

use serde::Serialize;
use uuid::Uuid;

use crate::engagement::normalized_score;

/// One campaign with its summed tracked-link clicks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignClicks {
    pub campaign_id: Uuid,
    pub avatar_id: Uuid,
    pub avatar_name: String,
    pub channel: String,
    pub angle: String,
    pub total_clicks: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AvatarRollup {
    pub avatar_id: Uuid,
    pub avatar_name: String,
    pub total_clicks: u64,
    pub normalized_score: u8,
    pub top_channel: Option<String>,
    pub campaign_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChannelRollup {
    pub channel: String,
    pub total_clicks: u64,
    pub normalized_score: u8,
    pub campaign_count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CampaignRollup {
    pub campaign_id: Uuid,
    pub avatar_id: Uuid,
    pub channel: String,
    pub angle: String,
    pub total_clicks: u64,
    pub normalized_score: u8,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PerformanceRollup {
    pub has_data: bool,
    pub total_clicks: u64,
    pub avatars: Vec<AvatarRollup>,
    pub channels: Vec<ChannelRollup>,
    pub campaigns: Vec<CampaignRollup>,
}

struct AvatarAcc {
    avatar_id: Uuid,
    avatar_name: String,
    total_clicks: u64,
    campaign_count: usize,
    // (channel, clicks) in first-seen order
    channels: Vec<(String, u64)>,
}

impl AvatarAcc {
    fn top_channel(&self) -> Option<String> {
        let mut best: Option<&(String, u64)> = None;
        for entry in &self.channels {
            if best.is_none_or(|b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(channel, _)| channel.clone())
    }
}

/// Build all three roll-up levels from one set of campaigns.
///
/// An empty input yields `has_data == false` with every total at zero.
/// Each list is sorted by clicks descending; ties keep first-seen order.
#[must_use]
pub fn roll_up(campaigns: &[CampaignClicks]) -> PerformanceRollup {
    if campaigns.is_empty() {
        return PerformanceRollup::default();
    }

    let mut avatars: Vec<AvatarAcc> = Vec::new();
    let mut avatar_index: HashMap<Uuid, usize> = HashMap::new();
    let mut channels: Vec<(String, u64, usize)> = Vec::new();
    let mut channel_index: HashMap<&str, usize> = HashMap::new();

    for c in campaigns {
        let idx = *avatar_index.entry(c.avatar_id).or_insert_with(|| {
            avatars.push(AvatarAcc {
                avatar_id: c.avatar_id,
                avatar_name: c.avatar_name.clone(),
                total_clicks: 0,
                campaign_count: 0,
                channels: Vec::new(),
            });
            avatars.len() - 1
        });
        let acc = &mut avatars[idx];
        acc.total_clicks += c.total_clicks;
        acc.campaign_count += 1;
        match acc.channels.iter_mut().find(|(ch, _)| *ch == c.channel) {
            Some(entry) => entry.1 += c.total_clicks,
            None => acc.channels.push((c.channel.clone(), c.total_clicks)),
        }

        let cidx = *channel_index.entry(c.channel.as_str()).or_insert_with(|| {
            channels.push((c.channel.clone(), 0, 0));
            channels.len() - 1
        });
        channels[cidx].1 += c.total_clicks;
        channels[cidx].2 += 1;
    }

    let max_avatar = avatars.iter().map(|a| a.total_clicks).max().unwrap_or(0);
    let max_channel = channels.iter().map(|c| c.1).max().unwrap_or(0);
    let max_campaign = campaigns.iter().map(|c| c.total_clicks).max().unwrap_or(0);

    let mut avatar_rollups: Vec<AvatarRollup> = avatars
        .iter()
        .map(|a| AvatarRollup {
            avatar_id: a.avatar_id,
            avatar_name: a.avatar_name.clone(),
            total_clicks: a.total_clicks,
            normalized_score: normalized_score(a.total_clicks, max_avatar),
            top_channel: a.top_channel(),
            campaign_count: a.campaign_count,
        })
        .collect();

    let mut channel_rollups: Vec<ChannelRollup> = channels
        .into_iter()
        .map(|(channel, total_clicks, campaign_count)| ChannelRollup {
            channel,
            total_clicks,
            normalized_score: normalized_score(total_clicks, max_channel),
            campaign_count,
        })
        .collect();

    let mut campaign_rollups: Vec<CampaignRollup> = campaigns
        .iter()
        .map(|c| CampaignRollup {
            campaign_id: c.campaign_id,
            avatar_id: c.avatar_id,
            channel: c.channel.clone(),
            angle: c.angle.clone(),
            total_clicks: c.total_clicks,
            normalized_score: normalized_score(c.total_clicks, max_campaign),
        })
        .collect();

    // sort_by is stable, so equal totals stay in first-seen order
    avatar_rollups.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));
    channel_rollups.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));
    campaign_rollups.sort_by(|a, b| b.total_clicks.cmp(&a.total_clicks));

    PerformanceRollup {
        has_data: true,
        total_clicks: campaigns.iter().map(|c| c.total_clicks).sum(),
        avatars: avatar_rollups,
        channels: channel_rollups,
        campaigns: campaign_rollups,
    }
}
