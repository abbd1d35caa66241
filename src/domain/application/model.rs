use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Accepted,
    Archived,
}

pub const ALL_STATUSES: [ApplicationStatus; 6] = [
    ApplicationStatus::Applied,
    ApplicationStatus::Interviewing,
    ApplicationStatus::Offer,
    ApplicationStatus::Rejected,
    ApplicationStatus::Accepted,
    ApplicationStatus::Archived,
];

impl ApplicationStatus {
    /// Storage form
    pub fn as_str(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Interviewing => "INTERVIEWING",
            ApplicationStatus::Offer => "OFFER",
            ApplicationStatus::Rejected => "REJECTED",
            ApplicationStatus::Accepted => "ACCEPTED",
            ApplicationStatus::Archived => "ARCHIVED",
        }
    }

    pub fn invalid_message() -> String {
        let names: Vec<&str> = ALL_STATUSES.iter().map(|s| s.as_str()).collect();
        format!("Invalid status. Must be one of: {}", names.join(", "))
    }
}

impl fmt::Display for ApplicationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        ALL_STATUSES
            .into_iter()
            .find(|status| status.as_str() == upper)
            .ok_or_else(ApplicationStatus::invalid_message)
    }
}
