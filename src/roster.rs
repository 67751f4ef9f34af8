// 📋 Roster - the stored list of registered swimmers

use crate::store::{Event, Store, SWIMMERS_KEY};
use crate::swimmer::Swimmer;
use tracing::info;

/// Swimmer list backed by the store. Storage failures are logged and the
/// roster behaves as if empty.
pub struct Roster<'a> {
    store: &'a Store,
}

impl<'a> Roster<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// All swimmers in registration order
    pub fn swimmers(&self) -> Vec<Swimmer> {
        self.store.load_or_default(SWIMMERS_KEY)
    }

    pub fn count(&self) -> usize {
        self.swimmers().len()
    }

    pub fn save(&self, swimmers: &[Swimmer]) {
        self.store.save_or_log(SWIMMERS_KEY, &swimmers);
    }

    pub fn add(&self, swimmer: Swimmer, actor: &str) {
        let mut swimmers = self.swimmers();
        let id = swimmer.id.clone();
        let data = serde_json::json!({
            "name": swimmer.name,
            "competition": swimmer.competition,
            "event": swimmer.event,
        });

        swimmers.push(swimmer);
        self.save(&swimmers);

        self.store.record(Event::new("swimmer_registered", "swimmer", &id, data, actor));
        info!(id = %id, "swimmer registered");
    }

    /// Remove the swimmer with `id`. Returns false when nothing matched.
    pub fn delete(&self, id: &str, actor: &str) -> bool {
        let mut swimmers = self.swimmers();
        let before = swimmers.len();
        swimmers.retain(|s| s.id != id);

        if swimmers.len() == before {
            return false;
        }

        self.save(&swimmers);
        self.store.record(Event::new(
            "swimmer_deleted",
            "swimmer",
            id,
            serde_json::json!({}),
            actor,
        ));
        info!(id, "swimmer deleted");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swimmer::SwimmerForm;

    fn register(roster: &Roster, name: &str) -> Swimmer {
        let form = SwimmerForm {
            name: name.to_string(),
            birth_year: "2008".to_string(),
            competition: "Spring Meet".to_string(),
            event: "50m Butterfly".to_string(),
            entry_time: "0:31.20".to_string(),
        };
        let swimmer = Swimmer::from_form(&form).unwrap();
        roster.add(swimmer.clone(), "coach-1");
        swimmer
    }

    #[test]
    fn test_add_and_delete() {
        let store = Store::open_in_memory().unwrap();
        let roster = Roster::new(&store);

        let first = register(&roster, "Anna");
        let second = register(&roster, "Ben");
        assert_eq!(roster.count(), 2);

        assert!(roster.delete(&first.id, "admin-default"));
        let remaining = roster.swimmers();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].id, second.id);

        // Unknown id leaves the roster untouched
        assert!(!roster.delete("does-not-exist", "admin-default"));
        assert_eq!(roster.count(), 1);
    }

    #[test]
    fn test_roster_survives_reload() {
        let store = Store::open_in_memory().unwrap();
        let added = register(&Roster::new(&store), "Chloé");

        let reloaded = Roster::new(&store).swimmers();
        assert_eq!(reloaded, vec![added]);
    }

    #[test]
    fn test_corrupted_roster_reads_as_empty() {
        let store = Store::open_in_memory().unwrap();
        store.put_raw(SWIMMERS_KEY, "[{\"id\": 1").unwrap();

        let roster = Roster::new(&store);
        assert!(roster.swimmers().is_empty());

        // Adding after corruption starts a fresh list
        register(&roster, "Dan");
        assert_eq!(roster.count(), 1);
    }

    #[test]
    fn test_changes_are_audited() {
        let store = Store::open_in_memory().unwrap();
        let roster = Roster::new(&store);
        let swimmer = register(&roster, "Eve");
        roster.delete(&swimmer.id, "admin-default");

        let events = store.get_events_for_entity("swimmer", &swimmer.id).unwrap();
        let types: Vec<&str> = events.iter().map(|e| e.event_type.as_str()).collect();
        assert!(types.contains(&"swimmer_registered"));
        assert!(types.contains(&"swimmer_deleted"));
    }

    #[test]
    fn test_registration_audited_after_save() {
        let store = Store::open_in_memory().unwrap();
        let swimmer = register(&Roster::new(&store), "Farah");

        let saved_at = store.updated_at(SWIMMERS_KEY).unwrap().unwrap();
        let events = store.get_events_for_entity("swimmer", &swimmer.id).unwrap();
        let registered = events
            .iter()
            .find(|e| e.event_type == "swimmer_registered")
            .unwrap();

        assert!(registered.timestamp >= saved_at);
        assert_eq!(registered.data["name"], "Farah");
    }
}
