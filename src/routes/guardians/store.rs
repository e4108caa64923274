use chrono::Utc;
use uuid::Uuid;

use super::Guardian;

/// In-memory guardian list, kept in insertion order.
#[derive(Debug, Default)]
pub struct GuardianBook {
    guardians: Vec<Guardian>,
}

impl GuardianBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// A book pre-filled with sample contacts for local use.
    pub fn seeded() -> Self {
        let mut book = Self::new();
        for (name, phone) in [
            ("Jane Doe", "(555) 123-4567"),
            ("John Smith", "(555) 987-6543"),
            ("Alex Johnson", "(555) 555-5555"),
        ] {
            book.insert(name.to_string(), phone.to_string());
        }
        book
    }

    pub fn list(&self) -> &[Guardian] {
        &self.guardians
    }

    pub fn get(&self, id: Uuid) -> Option<&Guardian> {
        self.guardians.iter().find(|g| g.id == id)
    }

    /// The guardian who receives automated check-ins.
    pub fn primary(&self) -> Option<&Guardian> {
        self.guardians.first()
    }

    pub fn insert(&mut self, name: String, phone: String) -> Guardian {
        let guardian = Guardian {
            id: Uuid::new_v4(),
            name,
            phone,
            created_at: Utc::now(),
        };
        self.guardians.push(guardian.clone());
        guardian
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Guardian> {
        let idx = self.guardians.iter().position(|g| g.id == id)?;
        Some(self.guardians.remove(idx))
    }

    pub fn len(&self) -> usize {
        self.guardians.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guardians.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_book() {
        let book = GuardianBook::seeded();
        assert_eq!(book.len(), 3);
        assert_eq!(book.primary().unwrap().name, "Jane Doe");
    }

    #[test]
    fn test_insert_get_remove() {
        let mut book = GuardianBook::new();
        assert!(book.primary().is_none());

        let first = book.insert("Jane".to_string(), "111".to_string());
        let second = book.insert("John".to_string(), "222".to_string());
        assert_ne!(first.id, second.id);
        assert_eq!(book.get(second.id).unwrap().phone, "222");

        let removed = book.remove(first.id).unwrap();
        assert_eq!(removed.name, "Jane");
        assert_eq!(book.primary().unwrap().id, second.id);
        assert!(book.remove(first.id).is_none());
    }
}
