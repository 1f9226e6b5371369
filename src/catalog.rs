//! Package group catalog
//!
//! Maps the wizard's user-visible group identifiers to the package tokens
//! the installer actually receives. Identifiers that match no group pass
//! through as literal package names (custom entries).

use serde::{Deserialize, Serialize};

/// A selectable group of packages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageGroup {
    /// Stable identifier used in selections and config ("education")
    pub id: String,
    /// Human-readable label shown in the wizard ("Education")
    pub label: String,
    #[serde(default)]
    pub description: String,
    /// Package tokens handed to the package manager
    pub packages: Vec<String>,
}

impl PackageGroup {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        PackageGroup {
            id: id.into(),
            label: label.into(),
            description: String::new(),
            packages: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_packages(mut self, packages: &[&str]) -> Self {
        self.packages = packages.iter().map(|p| p.to_string()).collect();
        self
    }
}

impl std::fmt::Display for PackageGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label)
    }
}

/// Built-in group definition (static counterpart of [`PackageGroup`])
struct BuiltinGroup {
    id: &'static str,
    label: &'static str,
    description: &'static str,
    packages: &'static [&'static str],
}

static BUILTIN_GROUPS: &[BuiltinGroup] = &[
    BuiltinGroup {
        id: "education",
        label: "Education",
        description: "Learning and science applications",
        packages: &["gcompris-qt", "kalzium", "marble", "stellarium"],
    },
    BuiltinGroup {
        id: "programming",
        label: "Programming",
        description: "Compilers, editors and developer tooling",
        packages: &["git", "base-devel", "python", "code"],
    },
    BuiltinGroup {
        id: "office",
        label: "Office",
        description: "Documents, mail and PDF reading",
        packages: &["libreoffice-fresh", "okular", "thunderbird"],
    },
    BuiltinGroup {
        id: "daily-use",
        label: "Daily Use",
        description: "Browser, media playback and photos",
        packages: &["firefox", "vlc", "gwenview"],
    },
    BuiltinGroup {
        id: "gaming",
        label: "Gaming",
        description: "Game launchers and performance tools",
        packages: &["steam", "lutris", "gamemode"],
    },
];

/// The resolvable set of package groups for one wizard run
#[derive(Debug, Clone)]
pub struct Catalog {
    groups: Vec<PackageGroup>,
}

impl Catalog {
    /// Catalog with the built-in groups
    pub fn builtin() -> Self {
        let groups = BUILTIN_GROUPS
            .iter()
            .map(|g| {
                PackageGroup::new(g.id, g.label)
                    .with_description(g.description)
                    .with_packages(g.packages)
            })
            .collect();
        Catalog { groups }
    }

    /// Catalog from explicit groups (config override). Falls back to the
    /// built-ins when the list is empty.
    pub fn from_groups(groups: Vec<PackageGroup>) -> Self {
        if groups.is_empty() {
            Self::builtin()
        } else {
            Catalog { groups }
        }
    }

    pub fn groups(&self) -> &[PackageGroup] {
        &self.groups
    }

    /// Look up a group by identifier or label, case-insensitively
    pub fn find(&self, identifier: &str) -> Option<&PackageGroup> {
        let wanted = identifier.trim().to_lowercase();
        self.groups
            .iter()
            .find(|g| g.id.to_lowercase() == wanted || g.label.to_lowercase() == wanted)
    }

    /// Expand one identifier into package tokens.
    ///
    /// A known group yields its package list; anything else is treated as a
    /// literal package name (custom entry) and returned as-is for the
    /// command builder to sanitize.
    pub fn resolve(&self, identifier: &str) -> Vec<String> {
        match self.find(identifier) {
            Some(group) => group.packages.clone(),
            None => vec![identifier.trim().to_string()],
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
