use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetType {
    All,
    Department,
    Role,
    Individual,
}

impl TargetType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Department => "department",
            Self::Role => "role",
            Self::Individual => "individual",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "department" => Some(Self::Department),
            "role" => Some(Self::Role),
            "individual" => Some(Self::Individual),
            _ => None,
        }
    }
}

pub const PRIORITIES: [&str; 4] = ["low", "normal", "high", "urgent"];

#[derive(Debug, Clone)]
pub struct CreateBroadcastParams {
    pub title: String,
    pub content: String,
    pub priority: String,
    pub target_type: TargetType,
    pub target_ids: Vec<i32>,
    pub expires_at: Option<DateTime<Utc>>,
    pub created_by: i32,
}

/// Read statistics for one broadcast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReadStats {
    pub recipient_count: u64,
    pub read_count: u64,
}

#[cfg(test)]
mod tests {
    use super::TargetType;

    #[test]
    fn parses_target_types() {
        assert_eq!(TargetType::parse("role"), Some(TargetType::Role));
        assert_eq!(TargetType::parse("everyone"), None);
    }
}
