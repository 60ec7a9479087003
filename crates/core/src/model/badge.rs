use crate::model::curriculum::{Curriculum, LessonCategory};
use crate::model::ids::{BadgeId, Topic};
use crate::model::profile::ProfileSnapshot;

/// Badge-list marker written when the final project is submitted.
pub const PROJECT_COMPLETED_MARKER: &str = "project-completed";

/// The project-completed marker as a badge id.
#[must_use]
pub fn project_completed_marker() -> BadgeId {
    BadgeId::from_static(PROJECT_COMPLETED_MARKER)
}

/// Predicate deciding whether a badge is earned.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BadgeRule {
    /// Every lesson of the category completed and its quiz passed.
    CategoryMastery(LessonCategory),
    /// Every lesson completed and every quiz topic passed.
    FullCourse,
    /// The id is present in the stored badge list.
    Marker(BadgeId),
}

impl BadgeRule {
    #[must_use]
    pub fn is_met(&self, curriculum: &Curriculum, profile: &ProfileSnapshot) -> bool {
        match self {
            Self::CategoryMastery(category) => {
                let topic = Topic::from_static(category.topic_key());
                curriculum
                    .lessons_in(*category)
                    .all(|lesson| profile.has_completed(lesson))
                    && profile.has_passed(&topic)
            }
            Self::FullCourse => {
                curriculum
                    .lessons()
                    .iter()
                    .all(|lesson| profile.has_completed(lesson.id()))
                    && curriculum.topics().iter().all(|t| profile.has_passed(t))
            }
            Self::Marker(marker) => profile.has_badge(marker),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    id: BadgeId,
    name: &'static str,
    description: &'static str,
    icon: &'static str,
    rule: BadgeRule,
}

impl Badge {
    #[must_use]
    pub fn id(&self) -> &BadgeId {
        &self.id
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn description(&self) -> &'static str {
        self.description
    }

    #[must_use]
    pub fn icon(&self) -> &'static str {
        self.icon
    }

    #[must_use]
    pub fn rule(&self) -> &BadgeRule {
        &self.rule
    }
}

/// The set of badges a learner can unlock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BadgeCatalog {
    badges: Vec<Badge>,
}

impl BadgeCatalog {
    #[must_use]
    pub fn builtin() -> Self {
        let badge = |id: &'static str,
                     name: &'static str,
                     description: &'static str,
                     icon: &'static str,
                     rule: BadgeRule| Badge {
            id: BadgeId::from_static(id),
            name,
            description,
            icon,
            rule,
        };
        Self {
            badges: vec![
                badge(
                    "html-master",
                    "HTML Master",
                    "Complete all HTML lessons and pass the HTML quiz",
                    "🏗️",
                    BadgeRule::CategoryMastery(LessonCategory::Html),
                ),
                badge(
                    "css-master",
                    "CSS Master",
                    "Complete all CSS lessons and pass the CSS quiz",
                    "🎨",
                    BadgeRule::CategoryMastery(LessonCategory::Css),
                ),
                badge(
                    "js-master",
                    "JavaScript Master",
                    "Complete all JavaScript lessons and pass the JavaScript quiz",
                    "⚡",
                    BadgeRule::CategoryMastery(LessonCategory::JavaScript),
                ),
                badge(
                    "full-stack-beginner",
                    "Full Stack Beginner",
                    "Complete all lessons and pass all quizzes",
                    "🎓",
                    BadgeRule::FullCourse,
                ),
                badge(
                    "project-builder",
                    "Project Builder",
                    "Complete the final project",
                    "🚀",
                    BadgeRule::Marker(project_completed_marker()),
                ),
            ],
        }
    }

    #[must_use]
    pub fn badges(&self) -> &[Badge] {
        &self.badges
    }

    /// Badges whose rule holds for `profile`, in catalog order.
    #[must_use]
    pub fn earned<'a>(&'a self, curriculum: &Curriculum, profile: &ProfileSnapshot) -> Vec<&'a Badge> {
        self.badges
            .iter()
            .filter(|b| b.rule.is_met(curriculum, profile))
            .collect()
    }
}

impl Default for BadgeCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ids::LessonId;
    use crate::model::quiz::{QuizResult, SubmissionStatus};
    use crate::time::fixed_now;

    fn result(passed: bool, status: SubmissionStatus) -> QuizResult {
        QuizResult {
            score: 12,
            total_questions: 15,
            passed,
            completed_at: fixed_now(),
            reviewed_by: Some("Tatawi".into()),
            feedback: None,
            status,
        }
    }

    fn lessons(ids: &[&str]) -> Vec<LessonId> {
        ids.iter().map(|id| LessonId::new(*id).unwrap()).collect()
    }

    fn earned_ids(profile: &ProfileSnapshot) -> Vec<String> {
        BadgeCatalog::builtin()
            .earned(&Curriculum::builtin(), profile)
            .iter()
            .map(|b| b.id().to_string())
            .collect()
    }

    #[test]
    fn html_master_needs_lessons_and_a_reviewed_pass() {
        let mut profile = ProfileSnapshot::new("Alae");
        profile.completed_lessons = lessons(&["html-basics", "html-forms"]);
        assert!(earned_ids(&profile).is_empty());

        profile.results.insert(
            Topic::new("html").unwrap(),
            vec![result(false, SubmissionStatus::Reviewed), result(true, SubmissionStatus::Reviewed)],
        );
        assert_eq!(earned_ids(&profile), vec!["html-master"]);
    }

    #[test]
    fn unreviewed_pass_does_not_count() {
        let mut profile = ProfileSnapshot::new("Alae");
        profile.completed_lessons = lessons(&["css-basics", "css-flexbox"]);
        profile.results.insert(
            Topic::new("css").unwrap(),
            vec![result(true, SubmissionStatus::Pending)],
        );
        assert!(earned_ids(&profile).is_empty());
    }

    #[test]
    fn full_course_unlocks_every_mastery_badge() {
        let curriculum = Curriculum::builtin();
        let mut profile = ProfileSnapshot::new("Alae");
        profile.completed_lessons = curriculum.lessons().iter().map(|l| l.id().clone()).collect();
        for topic in curriculum.topics() {
            profile
                .results
                .insert(topic.clone(), vec![result(true, SubmissionStatus::Reviewed)]);
        }

        assert_eq!(
            earned_ids(&profile),
            vec!["html-master", "css-master", "js-master", "full-stack-beginner"]
        );
    }

    #[test]
    fn project_builder_follows_the_marker() {
        let mut profile = ProfileSnapshot::new("Alae");
        profile.badges.push(BadgeId::new(PROJECT_COMPLETED_MARKER).unwrap());
        assert_eq!(earned_ids(&profile), vec!["project-builder"]);
    }
}
