use tracing::debug;

use invite_types::api::{AttendanceCounts, DashboardResponse};
use invite_types::models::{Participant, Rsvp};

use crate::attendance::{CeremonyStatus, DinnerStatus, classify_ceremony, classify_dinner};

/// Participants bucketed by ceremony and dinner status. Each bucket keeps
/// the input order.
#[derive(Debug, Default)]
pub struct Cohorts<'a> {
    pub ceremony_yes: Vec<&'a Participant>,
    pub ceremony_no: Vec<&'a Participant>,
    pub ceremony_pending: Vec<&'a Participant>,
    pub dinner_yes: Vec<&'a Participant>,
    pub dinner_no: Vec<&'a Participant>,
    pub dinner_pending: Vec<&'a Participant>,
    pub dinner_not_invited: Vec<&'a Participant>,
    total: usize,
}

/// Single pass: every participant lands in exactly one ceremony bucket and
/// exactly one dinner bucket.
pub fn partition(participants: &[Participant]) -> Cohorts<'_> {
    let mut cohorts = Cohorts {
        total: participants.len(),
        ..Cohorts::default()
    };

    for participant in participants {
        match classify_ceremony(participant.rsvp.as_ref()) {
            CeremonyStatus::Yes => cohorts.ceremony_yes.push(participant),
            CeremonyStatus::No => cohorts.ceremony_no.push(participant),
            CeremonyStatus::Pending => cohorts.ceremony_pending.push(participant),
        }
        match classify_dinner(participant) {
            DinnerStatus::Yes => cohorts.dinner_yes.push(participant),
            DinnerStatus::No => cohorts.dinner_no.push(participant),
            DinnerStatus::Pending => cohorts.dinner_pending.push(participant),
            DinnerStatus::NotInvited => cohorts.dinner_not_invited.push(participant),
        }
    }

    debug!(
        total = cohorts.total,
        ceremony_yes = cohorts.ceremony_yes.len(),
        dinner_yes = cohorts.dinner_yes.len(),
        "Partitioned participants"
    );
    cohorts
}

/// `round(100 * yes / total)`, rounding halves up, and exactly 0 when
/// nobody has answered.
pub fn attendance_rate(yes: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    ((yes * 200 + total) / (total * 2)) as u32
}

impl Cohorts<'_> {
    pub fn counts(&self) -> AttendanceCounts {
        let ceremony_yes = self.ceremony_yes.len();
        let ceremony_no = self.ceremony_no.len();
        let total_responses = ceremony_yes + ceremony_no;
        let dinner_yes = self.dinner_yes.len();
        let dinner_no = self.dinner_no.len();
        let dinner_pending = self.dinner_pending.len();

        AttendanceCounts {
            total_participants: self.total,
            ceremony_yes,
            ceremony_no,
            ceremony_pending: self.ceremony_pending.len(),
            total_responses,
            attendance_rate: attendance_rate(ceremony_yes, total_responses),
            dinner_yes,
            dinner_no,
            dinner_pending,
            dinner_not_invited: self.dinner_not_invited.len(),
            // Every invited participant sits in exactly one of these three.
            dinner_invitees: dinner_yes + dinner_no + dinner_pending,
        }
    }

    pub fn dashboard(&self, recent_responses: Vec<Rsvp>) -> DashboardResponse {
        fn owned(bucket: &[&Participant]) -> Vec<Participant> {
            bucket.iter().map(|p| (*p).clone()).collect()
        }

        DashboardResponse {
            counts: self.counts(),
            ceremony_yes: owned(&self.ceremony_yes),
            ceremony_no: owned(&self.ceremony_no),
            ceremony_pending: owned(&self.ceremony_pending),
            dinner_yes: owned(&self.dinner_yes),
            dinner_no: owned(&self.dinner_no),
            dinner_pending: owned(&self.dinner_pending),
            dinner_not_invited: owned(&self.dinner_not_invited),
            recent_responses,
        }
    }
}

/// The `limit` most recently created RSVPs, newest first.
pub fn recent_responses(participants: &[Participant], limit: usize) -> Vec<Rsvp> {
    let mut rsvps: Vec<&Rsvp> = participants.iter().filter_map(|p| p.rsvp.as_ref()).collect();
    rsvps.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    rsvps.into_iter().take(limit).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{at, participant, rsvp};

    fn guests() -> Vec<Participant> {
        vec![
            participant("an", true, Some(rsvp(Some(true), Some(true)))),
            participant("binh", true, Some(rsvp(Some(true), None))),
            participant("chi", false, Some(rsvp(Some(false), Some(true)))),
            participant("dung", false, None),
            participant("em", true, None),
            participant("giang", true, Some(rsvp(None, Some(false)))),
        ]
    }

    fn usernames(bucket: &[&Participant]) -> Vec<String> {
        bucket.iter().map(|p| p.username.clone()).collect()
    }

    #[test]
    fn buckets_cover_every_participant_once() {
        let guests = guests();
        let cohorts = partition(&guests);

        let ceremony = cohorts.ceremony_yes.len() + cohorts.ceremony_no.len() + cohorts.ceremony_pending.len();
        let dinner = cohorts.dinner_yes.len()
            + cohorts.dinner_no.len()
            + cohorts.dinner_pending.len()
            + cohorts.dinner_not_invited.len();
        assert_eq!(ceremony, guests.len());
        assert_eq!(dinner, guests.len());
    }

    #[test]
    fn buckets_preserve_input_order() {
        let guests = guests();
        let cohorts = partition(&guests);

        assert_eq!(usernames(&cohorts.ceremony_yes), ["an", "binh"]);
        assert_eq!(usernames(&cohorts.ceremony_no), ["chi"]);
        assert_eq!(usernames(&cohorts.ceremony_pending), ["dung", "em", "giang"]);
        assert_eq!(usernames(&cohorts.dinner_yes), ["an"]);
        assert_eq!(usernames(&cohorts.dinner_no), ["giang"]);
        assert_eq!(usernames(&cohorts.dinner_pending), ["binh", "em"]);
        assert_eq!(usernames(&cohorts.dinner_not_invited), ["chi", "dung"]);
    }

    #[test]
    fn counts_and_rate() {
        let guests = guests();
        let counts = partition(&guests).counts();

        assert_eq!(counts.total_participants, 6);
        assert_eq!(counts.total_responses, 3);
        assert_eq!(counts.attendance_rate, 67);
        assert_eq!(counts.dinner_invitees, 4);
        assert_eq!(counts.dinner_not_invited, 2);
    }

    #[test]
    fn empty_input_has_zero_rate() {
        let counts = partition(&[]).counts();
        assert_eq!(counts, AttendanceCounts::default());
        assert_eq!(counts.attendance_rate, 0);
    }

    #[test]
    fn rate_rounds_half_up() {
        assert_eq!(attendance_rate(0, 0), 0);
        assert_eq!(attendance_rate(0, 4), 0);
        assert_eq!(attendance_rate(1, 3), 33);
        assert_eq!(attendance_rate(1, 8), 13);
        assert_eq!(attendance_rate(5, 5), 100);
    }

    #[test]
    fn recent_responses_newest_first() {
        let mut first = rsvp(Some(true), None);
        first.created_at = at(1);
        let mut second = rsvp(Some(false), None);
        second.created_at = at(9);
        let mut third = rsvp(None, None);
        third.created_at = at(5);
        let second_id = second.id;

        let guests = vec![
            participant("a", false, Some(first)),
            participant("b", false, None),
            participant("c", false, Some(second)),
            participant("d", false, Some(third)),
        ];

        let recent = recent_responses(&guests, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].id, second_id);
        assert_eq!(recent[1].created_at, at(5));
    }
}
