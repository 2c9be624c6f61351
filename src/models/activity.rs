//! Activity (notification) model and its filters

use chrono::Duration;
use serde::{Deserialize, Serialize};

use super::Identified;

/// What happened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    /// Someone followed the user
    Followed,
    /// Someone replied to a post
    Reply,
    /// Someone liked a post
    Like,
    /// Someone reposted a post
    Repost,
    /// Someone mentioned the user
    Mention,
    /// Someone quoted a post
    Quote,
    /// The account got verified
    Verified,
}

impl ActivityKind {
    /// Every kind, in declaration order
    pub const fn all() -> &'static [Self] {
        &[
            Self::Followed,
            Self::Reply,
            Self::Like,
            Self::Repost,
            Self::Mention,
            Self::Quote,
            Self::Verified,
        ]
    }

    /// Wire name
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Followed => "followed",
            Self::Reply => "reply",
            Self::Like => "like",
            Self::Repost => "repost",
            Self::Mention => "mention",
            Self::Quote => "quote",
            Self::Verified => "verified",
        }
    }

    /// Notification text shown next to the actor's name
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Followed => "started following you",
            Self::Reply => "replied to your post",
            Self::Like => "liked your post",
            Self::Repost => "reposted your post",
            Self::Mention => "mentioned you",
            Self::Quote => "quoted your post",
            Self::Verified => "verified your account",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse "how long ago" bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeAgo {
    /// One minute
    #[serde(rename = "1m")]
    OneMinute,
    /// Five minutes
    #[serde(rename = "5m")]
    FiveMinutes,
    /// Ten minutes
    #[serde(rename = "10m")]
    TenMinutes,
    /// Half an hour
    #[serde(rename = "30m")]
    ThirtyMinutes,
    /// One hour
    #[serde(rename = "1h")]
    OneHour,
    /// Two hours
    #[serde(rename = "2h")]
    TwoHours,
    /// Five hours
    #[serde(rename = "5h")]
    FiveHours,
    /// One day
    #[serde(rename = "1d")]
    OneDay,
    /// Two days
    #[serde(rename = "2d")]
    TwoDays,
    /// One week
    #[serde(rename = "1w")]
    OneWeek,
}

impl TimeAgo {
    /// Every bucket, newest first
    pub const fn all() -> &'static [Self] {
        &[
            Self::OneMinute,
            Self::FiveMinutes,
            Self::TenMinutes,
            Self::ThirtyMinutes,
            Self::OneHour,
            Self::TwoHours,
            Self::FiveHours,
            Self::OneDay,
            Self::TwoDays,
            Self::OneWeek,
        ]
    }

    /// Label as rendered ("5m", "2h", ...)
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::OneMinute => "1m",
            Self::FiveMinutes => "5m",
            Self::TenMinutes => "10m",
            Self::ThirtyMinutes => "30m",
            Self::OneHour => "1h",
            Self::TwoHours => "2h",
            Self::FiveHours => "5h",
            Self::OneDay => "1d",
            Self::TwoDays => "2d",
            Self::OneWeek => "1w",
        }
    }

    /// Age the bucket stands for
    pub fn age(&self) -> Duration {
        match self {
            Self::OneMinute => Duration::minutes(1),
            Self::FiveMinutes => Duration::minutes(5),
            Self::TenMinutes => Duration::minutes(10),
            Self::ThirtyMinutes => Duration::minutes(30),
            Self::OneHour => Duration::hours(1),
            Self::TwoHours => Duration::hours(2),
            Self::FiveHours => Duration::hours(5),
            Self::OneDay => Duration::days(1),
            Self::TwoDays => Duration::days(2),
            Self::OneWeek => Duration::weeks(1),
        }
    }
}

impl std::fmt::Display for TimeAgo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A notification in the activity tab
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// UUID string
    pub id: String,
    /// Activity type
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    /// Notification text
    pub content: String,
    /// How long ago it happened
    pub time_ago: TimeAgo,
    /// "and N others"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub other_count: Option<u32>,
    /// Like count on the related post
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub likes: Option<u32>,
    /// Whether the user has seen it
    #[serde(default)]
    pub is_read: bool,
    /// Set for `verified` activities
    #[serde(default)]
    pub is_verified: bool,
    /// Actor id
    pub user_id: String,
    /// Related post, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
}

impl Activity {
    /// Create an activity with the generic placeholder text
    pub fn new(id: impl Into<String>, kind: ActivityKind, user_id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: "interacted with your content".to_string(),
            time_ago: TimeAgo::OneMinute,
            other_count: None,
            likes: None,
            is_read: false,
            is_verified: false,
            user_id: user_id.into(),
            post_id: None,
        }
    }

    /// Set content and verified flag from the activity type
    pub fn enrich(&mut self) {
        self.content = self.kind.message().to_string();
        self.is_verified = self.kind == ActivityKind::Verified;
    }

    /// Stable sort, most recent bucket first
    pub fn sort_recent_first<A: AsRef<Self>>(activities: &mut [A]) {
        activities.sort_by_key(|a| a.as_ref().time_ago.age());
    }
}

impl AsRef<Activity> for Activity {
    fn as_ref(&self) -> &Activity {
        self
    }
}

impl Identified for Activity {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Activity tab filter, as passed in `?type=`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    /// Everything
    #[default]
    All,
    /// `followed`
    Follows,
    /// `reply`
    Replies,
    /// `mention`
    Mentions,
    /// `quote`
    Quotes,
    /// `verified`
    Verified,
}

impl ActivityFilter {
    /// Parse a query value. Unknown values mean no filtering.
    pub fn parse(s: &str) -> Self {
        match s {
            "follows" => Self::Follows,
            "replies" => Self::Replies,
            "mentions" => Self::Mentions,
            "quotes" => Self::Quotes,
            "verified" => Self::Verified,
            _ => Self::All,
        }
    }

    /// Query value
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Follows => "follows",
            Self::Replies => "replies",
            Self::Mentions => "mentions",
            Self::Quotes => "quotes",
            Self::Verified => "verified",
        }
    }

    /// The activity type this filter keeps, or `None` for all
    pub const fn kind(&self) -> Option<ActivityKind> {
        match self {
            Self::All => None,
            Self::Follows => Some(ActivityKind::Followed),
            Self::Replies => Some(ActivityKind::Reply),
            Self::Mentions => Some(ActivityKind::Mention),
            Self::Quotes => Some(ActivityKind::Quote),
            Self::Verified => Some(ActivityKind::Verified),
        }
    }

    /// Whether `activity` passes the filter
    pub fn matches(&self, activity: &Activity) -> bool {
        self.kind().is_none_or(|kind| activity.kind == kind)
    }
}
