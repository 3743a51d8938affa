//! In-memory user registry.
//!
//! The registry is deliberately trivial — a keyed list behind a lock. The
//! [`UserStore`] trait keeps the handlers independent of the backing
//! collection, so a persistent implementation can slot in without touching
//! the pipeline or the routes.

use std::sync::RwLock;

use serde::{Deserialize, Serialize};

use crate::error::Fault;

/// A registered user. The id is assigned by the registry on create and never
/// changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: u32,
    pub name: String,
    pub email: String,
    pub department: String,
}

/// Payload for creating a user. All fields required and validated.
#[derive(Debug, Deserialize)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub department: String,
}

/// Payload for updating a user. Absent fields keep their current values.
#[derive(Debug, Default, Deserialize)]
pub struct UserPatch {
    pub id: Option<u32>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
}

/// The registry interface the handlers program against.
///
/// Every operation raises the standard fault taxonomy: `NotFound` for a
/// missing id, `Validation` for rejected input.
pub trait UserStore: Send + Sync + 'static {
    fn list(&self) -> Result<Vec<User>, Fault>;
    fn get(&self, id: u32) -> Result<User, Fault>;
    fn create(&self, new: NewUser) -> Result<User, Fault>;
    /// Applies a partial update and returns the updated user.
    fn update(&self, id: u32, patch: UserPatch) -> Result<User, Fault>;
    /// Removes a user and returns the removed record.
    fn delete(&self, id: u32) -> Result<User, Fault>;
}

// ── Validation ────────────────────────────────────────────────────────────────

const NAME_MAX: usize = 100;
const DEPARTMENT_MAX: usize = 50;

fn validate_name(name: &str) -> Result<(), Fault> {
    if name.trim().is_empty() {
        return Err(Fault::Validation("name is required".to_owned()));
    }
    if name.chars().count() > NAME_MAX {
        return Err(Fault::Validation(format!("name must be {NAME_MAX} characters or fewer")));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), Fault> {
    if email.trim().is_empty() {
        return Err(Fault::Validation("email is required".to_owned()));
    }
    let plausible = email
        .split_once('@')
        .is_some_and(|(local, domain)| !local.is_empty() && !domain.is_empty());
    if !plausible {
        return Err(Fault::Validation("email must be a valid email address".to_owned()));
    }
    Ok(())
}

fn validate_department(department: &str) -> Result<(), Fault> {
    if department.trim().is_empty() {
        return Err(Fault::Validation("department is required".to_owned()));
    }
    if department.chars().count() > DEPARTMENT_MAX {
        return Err(Fault::Validation(format!(
            "department must be {DEPARTMENT_MAX} characters or fewer"
        )));
    }
    Ok(())
}

// ── In-memory implementation ──────────────────────────────────────────────────

struct Table {
    users: Vec<User>,
    next_id: u32,
}

/// [`UserStore`] backed by a locked vector.
pub struct InMemoryUsers {
    table: RwLock<Table>,
}

impl InMemoryUsers {
    /// An empty registry; the first created user gets id 1.
    pub fn new() -> Self {
        Self { table: RwLock::new(Table { users: Vec::new(), next_id: 1 }) }
    }

    /// A registry pre-populated with two demo users.
    pub fn seeded() -> Self {
        let users = vec![
            User {
                id: 1,
                name: "John Doe".to_owned(),
                email: "john.doe@techhive.com".to_owned(),
                department: "IT".to_owned(),
            },
            User {
                id: 2,
                name: "Jane Smith".to_owned(),
                email: "jane.smith@techhive.com".to_owned(),
                department: "HR".to_owned(),
            },
        ];
        Self { table: RwLock::new(Table { users, next_id: 3 }) }
    }
}

impl Default for InMemoryUsers {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStore for InMemoryUsers {
    fn list(&self) -> Result<Vec<User>, Fault> {
        let table = self.table.read().map_err(Fault::internal)?;
        Ok(table.users.clone())
    }

    fn get(&self, id: u32) -> Result<User, Fault> {
        let table = self.table.read().map_err(Fault::internal)?;
        table.users.iter().find(|u| u.id == id).cloned().ok_or(Fault::NotFound)
    }

    fn create(&self, new: NewUser) -> Result<User, Fault> {
        validate_name(&new.name)?;
        validate_email(&new.email)?;
        validate_department(&new.department)?;

        let mut table = self.table.write().map_err(Fault::internal)?;
        let user = User {
            id: table.next_id,
            name: new.name,
            email: new.email,
            department: new.department,
        };
        table.next_id += 1;
        table.users.push(user.clone());
        Ok(user)
    }

    fn update(&self, id: u32, patch: UserPatch) -> Result<User, Fault> {
        // Payloads may echo the id back; any *other* id is rejected rather
        // than silently renumbering the record.
        if patch.id.is_some_and(|patch_id| patch_id != id && patch_id != 0) {
            return Err(Fault::Validation("user id cannot be changed".to_owned()));
        }
        if let Some(name) = &patch.name {
            validate_name(name)?;
        }
        if let Some(email) = &patch.email {
            validate_email(email)?;
        }
        if let Some(department) = &patch.department {
            validate_department(department)?;
        }

        let mut table = self.table.write().map_err(Fault::internal)?;
        let user = table
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(Fault::NotFound)?;

        if let Some(name) = patch.name {
            user.name = name;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(department) = patch.department {
            user.department = department;
        }
        Ok(user.clone())
    }

    fn delete(&self, id: u32) -> Result<User, Fault> {
        let mut table = self.table.write().map_err(Fault::internal)?;
        let index = table
            .users
            .iter()
            .position(|u| u.id == id)
            .ok_or(Fault::NotFound)?;
        Ok(table.users.remove(index))
    }
}
