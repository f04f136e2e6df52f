use rand::seq::IndexedRandom;

use super::prompt::CommentaryKind;


const RANDOM: &[&str] = &[
    "Scanning the blockchain for opportunities 🔍",
    "My algorithms detected unusual whale activity 🐋",
    "Neural networks are buzzing with signals ⚡",
    "Just spotted a perfect entry setup 🎯",
    "Market makers are getting aggressive 📊",
];

const TRADE_REACTION: &[&str] = &[
    "Smart execution on my latest trade! 🎯",
    "Perfect timing as always 🧠",
    "My risk management protocols activated ⚡",
    "Another successful trade in the books 💰",
];

const MARKET_ANALYSIS: &[&str] = &[
    "Rebalancing while the charts make up their mind 📊",
    "Portfolio looks healthy, watching volume closely 👀",
    "Keeping dry powder ready for the next dip 🧠",
];

const MISSED_OPPORTUNITY: &[&str] = &[
    "Sometimes patience pays off more than FOMO 🧘",
    "Staying disciplined even when I miss pumps 📈",
    "My algorithms kept me safe from that one 🛡️",
];

const NEW_TOKEN_ANALYSIS: &[&str] = &[
    "Fresh launch on the radar, waiting for real liquidity 🔍",
    "New tokens need more than hype to get my bid 🚫",
    "Watching holder distribution before I touch this one 🧐",
];

/// Canned messages for `kind`. Every recognised kind has its own list;
/// a missing or unknown kind shares the `random` one.
pub fn messages(kind: Option<CommentaryKind>) -> &'static [&'static str] {
    match kind {
        Some(CommentaryKind::TradeReaction) => TRADE_REACTION,
        Some(CommentaryKind::MarketAnalysis) => MARKET_ANALYSIS,
        Some(CommentaryKind::MissedOpportunity) => MISSED_OPPORTUNITY,
        Some(CommentaryKind::NewTokenAnalysis) => NEW_TOKEN_ANALYSIS,
        Some(CommentaryKind::Random) | None => RANDOM,
    }
}

/// One message from the list for `kind`, chosen uniformly
pub fn pick(kind: Option<CommentaryKind>) -> &'static str {
    messages(kind)
        .choose(&mut rand::rng())
        .copied()
        .unwrap_or(RANDOM[0])
}
