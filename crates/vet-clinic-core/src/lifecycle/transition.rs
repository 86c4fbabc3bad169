//! Appointment status state machine and its transition hook.

use crate::error::{ClinicError, ClinicResult};
use crate::models::{AppointmentStatus, AppointmentType};

/// Side effect a status change requires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionEffect {
    /// Append the clinical record for a newly completed appointment.
    DeriveRecord(AppointmentType),
}

/// Whether the state machine permits `from -> to`.
pub fn is_allowed(from: AppointmentStatus, to: AppointmentStatus) -> bool {
    use AppointmentStatus::*;
    from == to || matches!((from, to), (Scheduled, Completed) | (Scheduled, Cancelled))
}

/// Reject transitions the state machine does not define.
pub fn check(from: AppointmentStatus, to: AppointmentStatus) -> ClinicResult<()> {
    if is_allowed(from, to) {
        Ok(())
    } else {
        Err(ClinicError::Validation(format!(
            "appointment status cannot change from {from} to {to}"
        )))
    }
}

/// Effects of moving from `from` to `to`.
///
/// Completion derives a record only on the edge into `Completed`, so a repeated
/// completion yields nothing.
pub fn on_transition(
    from: AppointmentStatus,
    to: AppointmentStatus,
    appointment_type: AppointmentType,
) -> Vec<TransitionEffect> {
    if to == AppointmentStatus::Completed && from != AppointmentStatus::Completed {
        vec![TransitionEffect::DeriveRecord(appointment_type)]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use AppointmentStatus::*;

    fn status() -> impl Strategy<Value = AppointmentStatus> {
        prop::sample::select(AppointmentStatus::ALL.to_vec())
    }

    fn kind() -> impl Strategy<Value = AppointmentType> {
        prop::sample::select(vec![AppointmentType::Treatment, AppointmentType::Vaccination])
    }

    #[test]
    fn test_transition_table() {
        assert!(is_allowed(Scheduled, Completed));
        assert!(is_allowed(Scheduled, Cancelled));
        assert!(is_allowed(Completed, Completed));
        assert!(is_allowed(Cancelled, Cancelled));

        assert!(!is_allowed(Completed, Scheduled));
        assert!(!is_allowed(Completed, Cancelled));
        assert!(!is_allowed(Cancelled, Scheduled));
        assert!(!is_allowed(Cancelled, Completed));
    }

    #[test]
    fn test_completion_derives_matching_record() {
        assert_eq!(
            on_transition(Scheduled, Completed, AppointmentType::Vaccination),
            vec![TransitionEffect::DeriveRecord(AppointmentType::Vaccination)]
        );
        assert!(on_transition(Completed, Completed, AppointmentType::Vaccination).is_empty());
    }

    proptest! {
        #[test]
        fn prop_self_transition_always_allowed(s in status()) {
            prop_assert!(check(s, s).is_ok());
        }

        #[test]
        fn prop_terminal_states_stay_put(to in status()) {
            for from in [Completed, Cancelled] {
                prop_assert_eq!(check(from, to).is_ok(), from == to);
            }
        }

        #[test]
        fn prop_effect_only_on_edge_into_completed(from in status(), to in status(), k in kind()) {
            let effects = on_transition(from, to, k);
            let expected = to == Completed && from != Completed;
            prop_assert_eq!(!effects.is_empty(), expected);
            prop_assert!(effects.len() <= 1);
        }
    }
}
