use crate::error::Error;
use crate::profile::Profile;

/// Profiles by name, in registration order.
///
/// Names are unique: a profile can only be inserted if no profile with the
/// same name is present.
#[derive(Debug, Default)]
pub struct ProfileStore {
    profiles: Vec<Profile>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a profile. Fails with [`Error::DuplicateProfile`] if the name
    /// is taken, leaving the store unchanged.
    pub fn insert(&mut self, profile: Profile) -> Result<(), Error> {
        if self.contains(profile.name()) {
            return Err(Error::DuplicateProfile(profile.name().to_owned()));
        }
        self.profiles.push(profile);
        Ok(())
    }

    /// Removes the named profile, if any.
    pub fn remove(&mut self, name: &str) -> Option<Profile> {
        let i = self.profiles.iter().position(|p| p.name() == name)?;
        Some(self.profiles.remove(i))
    }

    pub fn get(&self, name: &str) -> Option<&Profile> {
        self.profiles.iter().find(|p| p.name() == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterates over the profiles in registration order.
    pub fn iter(&self) -> std::slice::Iter<'_, Profile> {
        self.profiles.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.iter().map(Profile::name)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

impl<'a> IntoIterator for &'a ProfileStore {
    type Item = &'a Profile;
    type IntoIter = std::slice::Iter<'a, Profile>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
