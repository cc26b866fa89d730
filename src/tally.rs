//! Read-only tally computation.
//!
//! Everything here is a pure function over data already read from the
//! database; nothing in this module mutates state. The vote counts come in
//! pre-grouped per (position, candidate) from
//! [`crate::model::db::vote::vote_counts`].

use crate::model::{
    api::stats::{CandidateTally, ElectionReport, PositionTally, SchoolLevelTally},
    common::SchoolLevel,
    db::{user::User, vote::VoteCount, Candidate, Position},
};

/// `part / whole` as a percentage, `0.0` when `whole` is zero.
fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Compute the full election report.
///
/// Admin users are excluded from every statistic. Candidate percentages use
/// the overall student count as denominator, not the position subgroup, so
/// they are comparable across positions.
pub fn election_report(
    users: &[User],
    positions: &[Position],
    candidates: &[Candidate],
    counts: &[VoteCount],
) -> ElectionReport {
    let students: Vec<&User> = users.iter().filter(|user| !user.is_admin).collect();
    let total_students = students.len() as u64;
    let voted_students = students.iter().filter(|user| user.has_voted).count() as u64;

    let school_levels = SchoolLevel::ALL
        .iter()
        .map(|&school_level| {
            let level_students: Vec<&&User> = students
                .iter()
                .filter(|user| user.school_level == Some(school_level))
                .collect();
            let total = level_students.len() as u64;
            let voted = level_students.iter().filter(|user| user.has_voted).count() as u64;
            SchoolLevelTally {
                school_level,
                total_students: total,
                voted_students: voted,
                percentage: percentage(voted, total),
            }
        })
        .collect();

    let mut ordered: Vec<&Position> = positions.iter().collect();
    ordered.sort_by(|a, b| {
        a.display_order
            .cmp(&b.display_order)
            .then_with(|| a.name.cmp(&b.name))
    });

    let positions = ordered
        .into_iter()
        .map(|position| {
            // Sum over all counts for the position, including votes for
            // since-deleted candidates, so committed votes are never dropped.
            let votes = counts
                .iter()
                .filter(|count| count.position_id == position.id)
                .map(|count| count.count)
                .sum();

            let candidates = candidates
                .iter()
                .filter(|candidate| candidate.position_id == position.id)
                .map(|candidate| {
                    let votes = counts
                        .iter()
                        .find(|count| {
                            count.position_id == position.id
                                && count.candidate_id == candidate.id
                        })
                        .map(|count| count.count)
                        .unwrap_or(0);
                    CandidateTally {
                        id: candidate.id,
                        name: candidate.name.clone(),
                        partylist_id: candidate.partylist_id,
                        votes,
                        percentage: percentage(votes, total_students),
                    }
                })
                .collect();

            PositionTally {
                id: position.id,
                name: position.name.clone(),
                votes,
                percentage: percentage(votes, total_students),
                candidates,
            }
        })
        .collect();

    ElectionReport {
        total_students,
        voted_students,
        participation_rate: percentage(voted_students, total_students),
        school_levels,
        positions,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::model::{
        db::{CandidateCore, PositionCore, UserCore},
        mongodb::Id,
    };

    fn user(core: UserCore) -> User {
        User {
            id: Id::new(),
            user: core,
        }
    }

    fn student(school_level: SchoolLevel, grade_level: u8, has_voted: bool) -> User {
        user(UserCore {
            name: "Student".to_string(),
            reference_number: Id::new().to_string(),
            is_admin: false,
            has_voted,
            school_level: Some(school_level),
            grade_level: Some(grade_level),
            password_hash: None,
        })
    }

    fn position(core: PositionCore) -> Position {
        Position {
            id: Id::new(),
            position: core,
        }
    }

    fn candidate(core: CandidateCore) -> Candidate {
        Candidate {
            id: Id::new(),
            candidate: core,
        }
    }

    #[test]
    fn empty_school_has_zero_rate_not_nan() {
        let report = election_report(&[], &[], &[], &[]);
        assert_eq!(report.total_students, 0);
        assert_eq!(report.voted_students, 0);
        assert_eq!(report.participation_rate, 0.0);
        for level in &report.school_levels {
            assert_eq!(level.percentage, 0.0);
        }
    }

    #[test]
    fn admins_are_excluded_everywhere() {
        let mut users = vec![user(UserCore::example_admin())];
        users.push(student(SchoolLevel::Elementary, 4, true));
        users.push(student(SchoolLevel::Elementary, 5, false));

        let report = election_report(&users, &[], &[], &[]);
        assert_eq!(report.total_students, 2);
        assert_eq!(report.voted_students, 1);
        assert_eq!(report.participation_rate, 50.0);
    }

    #[test]
    fn per_level_participation() {
        let users = vec![
            student(SchoolLevel::Elementary, 3, true),
            student(SchoolLevel::Elementary, 4, true),
            student(SchoolLevel::Elementary, 5, false),
            student(SchoolLevel::Elementary, 6, false),
            student(SchoolLevel::JuniorHigh, 8, true),
            // No senior high students at all.
        ];

        let report = election_report(&users, &[], &[], &[]);
        assert_eq!(report.school_levels.len(), 3);

        let elementary = &report.school_levels[0];
        assert_eq!(elementary.school_level, SchoolLevel::Elementary);
        assert_eq!(elementary.total_students, 4);
        assert_eq!(elementary.voted_students, 2);
        assert_eq!(elementary.percentage, 50.0);

        let junior = &report.school_levels[1];
        assert_eq!(junior.total_students, 1);
        assert_eq!(junior.percentage, 100.0);

        let senior = &report.school_levels[2];
        assert_eq!(senior.total_students, 0);
        assert_eq!(senior.percentage, 0.0);
    }

    /// Candidate percentages use the overall student count as denominator,
    /// even when only a subset of students is eligible for the position.
    #[test]
    fn candidate_percentage_uses_overall_student_count() {
        // Ten students; only the five elementary ones could vote for the
        // representative position.
        let mut users: Vec<User> = (1..=5)
            .map(|grade| student(SchoolLevel::Elementary, grade, true))
            .collect();
        users.extend((11..=12).flat_map(|grade| {
            [
                student(SchoolLevel::SeniorHigh, grade, false),
                student(SchoolLevel::SeniorHigh, grade, false),
            ]
        }));
        users.push(student(SchoolLevel::JuniorHigh, 9, false));
        assert_eq!(users.len(), 10);

        let rep = position(PositionCore::example_elementary_rep());
        let partylist_id = Id::new();
        let alpha = candidate(CandidateCore::example_alpha(rep.id, partylist_id));
        let beta = candidate(CandidateCore::example_beta(rep.id, partylist_id));

        let counts = vec![VoteCount {
            position_id: rep.id,
            candidate_id: alpha.id,
            count: 4,
        }];

        let report = election_report(
            &users,
            std::slice::from_ref(&rep),
            &[alpha.clone(), beta.clone()],
            &counts,
        );
        assert_eq!(report.total_students, 10);

        let rep_tally = &report.positions[0];
        assert_eq!(rep_tally.votes, 4);
        assert_eq!(rep_tally.percentage, 40.0);

        let alpha_tally = rep_tally
            .candidates
            .iter()
            .find(|c| c.id == alpha.id)
            .unwrap();
        assert_eq!(alpha_tally.votes, 4);
        assert_eq!(alpha_tally.percentage, 40.0);

        // Candidates without votes still appear, at zero.
        let beta_tally = rep_tally
            .candidates
            .iter()
            .find(|c| c.id == beta.id)
            .unwrap();
        assert_eq!(beta_tally.votes, 0);
        assert_eq!(beta_tally.percentage, 0.0);
    }

    #[test]
    fn positions_ordered_by_display_order() {
        let mut first = PositionCore::example_president();
        first.display_order = 5;
        let mut second = PositionCore::example_elementary_rep();
        second.display_order = 1;

        let positions = vec![position(first), position(second)];
        let report = election_report(&[], &positions, &[], &[]);

        assert_eq!(report.positions[0].name, "Elementary Representative");
        assert_eq!(report.positions[1].name, "President");
    }

    /// Votes whose candidate has been deleted still count toward the
    /// position total.
    #[test]
    fn orphaned_votes_still_counted_in_position_total() {
        let users = vec![student(SchoolLevel::Elementary, 5, true)];
        let pres = position(PositionCore::example_president());
        let counts = vec![VoteCount {
            position_id: pres.id,
            candidate_id: Id::new(),
            count: 1,
        }];

        let report = election_report(&users, std::slice::from_ref(&pres), &[], &counts);
        assert_eq!(report.positions[0].votes, 1);
        assert!(report.positions[0].candidates.is_empty());
    }
}
