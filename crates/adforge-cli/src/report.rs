//! Report command handlers: campaign roll-ups and learning insights.

use adforge_core::ActingRole;
use adforge_insights::{Frequency, InsightsReport, PerformanceReport, PieceInsight};
use clap::Subcommand;
use uuid::Uuid;

/// Sub-commands available under `report`.
#[derive(Debug, Subcommand)]
pub enum ReportCommands {
    /// Click roll-ups by avatar, channel and campaign plus per-piece scores
    Performance {
        /// Product id
        #[arg(long)]
        product: Uuid,
        /// Include archived pieces (admin only)
        #[arg(long)]
        include_archived: bool,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
    /// What worked: top and bottom pieces and shared traits
    Insights {
        /// Product id
        #[arg(long)]
        product: Uuid,
        /// Print the report as JSON
        #[arg(long)]
        json: bool,
    },
}

pub(crate) async fn run(
    pool: &sqlx::PgPool,
    role: ActingRole,
    command: ReportCommands,
) -> anyhow::Result<()> {
    match command {
        ReportCommands::Performance {
            product,
            include_archived,
            json,
        } => {
            let report =
                adforge_insights::performance_report(pool, product, role, include_archived)
                    .await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_performance(&report);
            }
        }
        ReportCommands::Insights { product, json } => {
            let report = adforge_insights::insights_report(pool, product, role).await?;
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                print_insights(&report);
            }
        }
    }
    Ok(())
}

fn print_performance(report: &PerformanceReport) {
    println!("# Performance: {}", report.product_name);
    println!();

    let rollup = &report.rollup;
    if rollup.has_data {
        println!("Total clicks: {}", rollup.total_clicks);
        println!();
        println!("{:<28}{:<8}{:<7}{:<11}TOP CHANNEL", "AVATAR", "CLICKS", "SCORE", "CAMPAIGNS");
        for a in &rollup.avatars {
            println!(
                "{:<28}{:<8}{:<7}{:<11}{}",
                a.avatar_name,
                a.total_clicks,
                a.normalized_score,
                a.campaign_count,
                a.top_channel.as_deref().unwrap_or("\u{2014}")
            );
        }
        println!();
        println!("{:<20}{:<8}{:<7}CAMPAIGNS", "CHANNEL", "CLICKS", "SCORE");
        for c in &rollup.channels {
            println!(
                "{:<20}{:<8}{:<7}{}",
                c.channel, c.total_clicks, c.normalized_score, c.campaign_count
            );
        }
    } else {
        println!("no tracked clicks yet");
    }

    if !report.pieces.is_empty() {
        println!();
        println!("{:<7}{:<18}{:<8}{:<12}TITLE", "SCORE", "TIER", "CLICKS", "ENGAGEMENT");
        for p in &report.pieces {
            println!(
                "{:<7}{:<18}{:<8}{:<12}{}",
                p.composite_score, p.tier.label, p.clicks, p.engagement_raw, p.title
            );
        }
    }
}

fn print_insights(report: &InsightsReport) {
    println!("# Insights: {}", report.product_name);
    println!();

    let Some(insights) = &report.insights else {
        println!("no clicks, engagement or ratings recorded yet");
        return;
    };

    println!("Scored pieces: {}", insights.scored_count);
    print_pieces("Top performers", &insights.top_performers);
    print_pieces("Underperformers", &insights.underperformers);
    print_pieces("Thumbs down", &insights.thumbs_down);

    let patterns = &insights.patterns;
    println!();
    println!("## Patterns in the top half");
    println!("Pain points:   {}", fmt_frequencies(&patterns.top_pain_points));
    println!("Channels:      {}", fmt_frequencies(&patterns.top_channels));
    println!("Content types: {}", fmt_frequencies(&patterns.top_content_types));
    for cue in &patterns.style_cues.cues {
        println!("- {cue}");
    }
}

fn print_pieces(heading: &str, pieces: &[PieceInsight]) {
    if pieces.is_empty() {
        return;
    }
    println!();
    println!("## {heading}");
    for p in pieces {
        println!(
            "{:>3}  {}  ({})",
            p.composite_score,
            p.title,
            p.channel.as_deref().unwrap_or("no campaign")
        );
    }
}

fn fmt_frequencies(values: &[Frequency]) -> String {
    if values.is_empty() {
        return "\u{2014}".to_string();
    }
    values
        .iter()
        .map(|f| format!("{} ({})", f.value, f.count))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fmt_frequencies_joins_with_counts() {
        let values = vec![
            Frequency {
                value: "instagram".to_string(),
                count: 3,
            },
            Frequency {
                value: "email".to_string(),
                count: 1,
            },
        ];
        assert_eq!(fmt_frequencies(&values), "instagram (3), email (1)");
        assert_eq!(fmt_frequencies(&[]), "\u{2014}");
    }
}
