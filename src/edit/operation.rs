//! Substitution strategies and the per-member operations they produce.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// Which part of a selected member a substitution rewrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Replace inside the member content, decoded as UTF-8.
    Text,
    /// Replace inside the member name.
    Filename,
}

impl Mode {
    /// Returns true if this mode needs the decompressed member payload.
    pub fn reads_content(self) -> bool {
        matches!(self, Mode::Text)
    }

    /// Returns the mode name as used on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Text => "text",
            Mode::Filename => "filename",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "text" => Ok(Mode::Text),
            "filename" => Ok(Mode::Filename),
            other => Err(format!("unknown mode '{}': expected 'text' or 'filename'", other)),
        }
    }
}

/// A literal find-and-replace pair bound to a [`Mode`].
///
/// Replacement is exact-substring, all non-overlapping occurrences, left to
/// right.
///
/// # Example
///
/// ```rust
/// use zipfnr::edit::{Mode, Operation, Substitution};
///
/// let sub = Substitution::new(Mode::Filename, "old", "new")?;
/// let op = sub.operation("old_report.txt", None)?;
/// assert_eq!(op.target_name(), "new_report.txt");
/// # Ok::<(), zipfnr::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitution {
    mode: Mode,
    find: String,
    replace: String,
}

impl Substitution {
    /// Creates a substitution.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EmptyPattern`] if `find` is empty in [`Mode::Text`].
    /// In [`Mode::Filename`] an empty `find` follows `str::replace` and
    /// inserts `replace` between every character.
    pub fn new(mode: Mode, find: impl Into<String>, replace: impl Into<String>) -> Result<Self> {
        let find = find.into();
        if mode == Mode::Text && find.is_empty() {
            return Err(Error::EmptyPattern);
        }
        Ok(Self {
            mode,
            find,
            replace: replace.into(),
        })
    }

    /// Creates a content substitution.
    pub fn text(find: impl Into<String>, replace: impl Into<String>) -> Result<Self> {
        Self::new(Mode::Text, find, replace)
    }

    /// Creates a name substitution.
    pub fn filename(find: impl Into<String>, replace: impl Into<String>) -> Self {
        Self {
            mode: Mode::Filename,
            find: find.into(),
            replace: replace.into(),
        }
    }

    /// Returns the mode.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Returns the search string.
    pub fn find(&self) -> &str {
        &self.find
    }

    /// Returns the replacement string.
    pub fn replace(&self) -> &str {
        &self.replace
    }

    /// Counts the non-overlapping occurrences of the search string in `haystack`.
    pub fn occurrences(&self, haystack: &str) -> usize {
        if self.find.is_empty() {
            // str::replace with an empty pattern matches at every char boundary
            haystack.chars().count() + 1
        } else {
            haystack.matches(self.find.as_str()).count()
        }
    }

    /// Applies the substitution to a member name.
    ///
    /// Returns `None` when the name contains no occurrence.
    pub fn rename(&self, name: &str) -> Option<String> {
        let count = self.occurrences(name);
        if count == 0 {
            return None;
        }
        Some(name.replace(self.find.as_str(), &self.replace))
    }

    /// Applies the substitution to a UTF-8 payload.
    ///
    /// Returns the new payload and the number of replacements, or `None`
    /// when the text contains no occurrence.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MemberDecode`] if `payload` is not valid UTF-8.
    pub fn rewrite_text(&self, name: &str, payload: &[u8]) -> Result<Option<(Vec<u8>, usize)>> {
        let text = std::str::from_utf8(payload).map_err(|e| Error::member_decode(name, e))?;
        let count = self.occurrences(text);
        if count == 0 {
            return Ok(None);
        }
        let replaced = text.replace(self.find.as_str(), &self.replace);
        Ok(Some((replaced.into_bytes(), count)))
    }

    /// Transforms a member, returning its (possibly new) name and payload.
    ///
    /// This is the plain strategy contract; the editor uses [`operation`]
    /// instead so that untouched payloads are never recompressed.
    ///
    /// [`operation`]: Self::operation
    pub fn transform(&self, name: &str, payload: Vec<u8>) -> Result<(String, Vec<u8>)> {
        match self.operation(name, Some(&payload))? {
            Operation::Copy { name } => Ok((name, payload)),
            Operation::Rename { to, .. } => Ok((to, payload)),
            Operation::Update { name, data, .. } => Ok((name, data)),
        }
    }

    /// Decides what happens to a selected member.
    ///
    /// `payload` is the decompressed content. It is only inspected in
    /// [`Mode::Text`]; passing `None` there (for example for a directory
    /// entry) yields [`Operation::Copy`].
    pub fn operation(&self, name: &str, payload: Option<&[u8]>) -> Result<Operation> {
        match self.mode {
            Mode::Filename => Ok(match self.rename(name) {
                Some(to) if to != name => Operation::Rename {
                    from: name.to_string(),
                    to,
                    substitutions: self.occurrences(name),
                },
                _ => Operation::Copy {
                    name: name.to_string(),
                },
            }),
            Mode::Text => {
                let rewritten = match payload {
                    Some(payload) => self.rewrite_text(name, payload)?,
                    None => None,
                };
                Ok(match rewritten {
                    Some((data, substitutions)) => Operation::Update {
                        name: name.to_string(),
                        data,
                        substitutions,
                    },
                    None => Operation::Copy {
                        name: name.to_string(),
                    },
                })
            }
        }
    }
}

/// What the editor does with one member of the source archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Copy the member verbatim (raw compressed bytes, same name).
    Copy {
        /// Member name.
        name: String,
    },
    /// Copy the member's raw bytes under a new name.
    Rename {
        /// Original name.
        from: String,
        /// New name.
        to: String,
        /// Number of replacements made in the name.
        substitutions: usize,
    },
    /// Write new content under the same name.
    Update {
        /// Member name.
        name: String,
        /// New content (will be compressed).
        data: Vec<u8>,
        /// Number of replacements made in the content.
        substitutions: usize,
    },
}

impl Operation {
    /// Returns the member name in the source archive.
    pub fn source_name(&self) -> &str {
        match self {
            Operation::Copy { name } => name,
            Operation::Rename { from, .. } => from,
            Operation::Update { name, .. } => name,
        }
    }

    /// Returns the member name in the output archive.
    pub fn target_name(&self) -> &str {
        match self {
            Operation::Copy { name } => name,
            Operation::Rename { to, .. } => to,
            Operation::Update { name, .. } => name,
        }
    }

    /// Returns the number of replacements this operation performs.
    pub fn substitutions(&self) -> usize {
        match self {
            Operation::Copy { .. } => 0,
            Operation::Rename { substitutions, .. } | Operation::Update { substitutions, .. } => {
                *substitutions
            }
        }
    }

    /// Returns true if the member differs from the source in name or content.
    pub fn is_change(&self) -> bool {
        !matches!(self, Operation::Copy { .. })
    }

    /// Returns the operation type as a string.
    pub fn operation_type(&self) -> &'static str {
        match self {
            Operation::Copy { .. } => "copy",
            Operation::Rename { .. } => "rename",
            Operation::Update { .. } => "update",
        }
    }
}

/// Several source members that would end up under the same output name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Collision {
    /// The shared output name.
    pub name: String,
    /// The source members mapping to it, in archive order.
    pub sources: Vec<String>,
}

/// Finds output names claimed by more than one member.
///
/// `members` lists every member name of the source archive in order;
/// `changes` holds the operations from a plan. Members without an operation
/// keep their name. The editor only reports the first duplicate it writes;
/// this lists all of them before anything is written.
pub fn find_collisions(members: &[String], changes: &[Operation]) -> Vec<Collision> {
    let renamed: HashMap<&str, &str> = changes
        .iter()
        .map(|op| (op.source_name(), op.target_name()))
        .collect();

    let mut by_target: BTreeMap<&str, Vec<String>> = BTreeMap::new();
    for name in members {
        let target = renamed.get(name.as_str()).copied().unwrap_or(name.as_str());
        by_target.entry(target).or_default().push(name.clone());
    }

    by_target
        .into_iter()
        .filter(|(_, sources)| sources.len() > 1)
        .map(|(name, sources)| Collision {
            name: name.to_string(),
            sources,
        })
        .collect()
}
