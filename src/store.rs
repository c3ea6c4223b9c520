use crate::calendar::DayIndex;
use crate::models::{Appointment, AppointmentStatus};

/// In-memory snapshot of the appointments loaded for one view session.
///
/// Mutations are local only. After `remove` or `update_status` the snapshot
/// may differ from what the backend holds until the next `replace_all`;
/// `local_mutations` says how far it has drifted.
#[derive(Debug, Default, Clone)]
pub struct AppointmentStore {
    appointments: Vec<Appointment>,
    local_mutations: usize,
}

impl AppointmentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_all(&mut self, appointments: Vec<Appointment>) {
        self.appointments = appointments;
        self.local_mutations = 0;
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    pub fn get(&self, id: i64) -> Option<&Appointment> {
        self.appointments.iter().find(|a| a.id == id)
    }

    pub fn len(&self) -> usize {
        self.appointments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.appointments.is_empty()
    }

    /// Drop appointment `id`, returning it if it was present.
    pub fn remove(&mut self, id: i64) -> Option<Appointment> {
        let pos = self.appointments.iter().position(|a| a.id == id)?;
        self.local_mutations += 1;
        Some(self.appointments.remove(pos))
    }

    /// Set the status of appointment `id`. Returns false if it is not loaded.
    pub fn update_status(&mut self, id: i64, status: AppointmentStatus) -> bool {
        match self.appointments.iter_mut().find(|a| a.id == id) {
            Some(appointment) => {
                appointment.status = status.as_str().to_string();
                self.local_mutations += 1;
                true
            }
            None => false,
        }
    }

    pub fn local_mutations(&self) -> usize {
        self.local_mutations
    }

    /// True while nothing has been changed locally since the last load.
    pub fn is_in_sync(&self) -> bool {
        self.local_mutations == 0
    }

    pub fn index(&self) -> DayIndex<'_> {
        DayIndex::build(&self.appointments)
    }
}
