use std::error::Error;
use std::path::Path;

use course_core::model::{QuizSubmission, ReviewDecision, SubmissionId};
use course_core::progress::QuizOverview;
use services::{AdminSession, AppServices};

type CommandResult = Result<(), Box<dyn Error>>;

fn decision_label(decision: ReviewDecision) -> &'static str {
    match decision {
        ReviewDecision::Pass => "pass",
        ReviewDecision::Fail => "fail",
    }
}

fn print_overview(overview: &QuizOverview) {
    println!(
        "{:<12} {:<12} best {:>2}  attempts {}",
        overview.topic,
        overview.status.as_str(),
        overview.best_score,
        overview.attempts
    );
}

fn print_submission(submission: &QuizSubmission) {
    println!(
        "{}  {:<10} {:<12} {} answers  submitted {}",
        submission.id,
        submission.topic,
        submission.user_name,
        submission.answers.len(),
        submission.submitted_at.format("%Y-%m-%d %H:%M")
    );
}

pub async fn lessons(app: &AppServices) -> CommandResult {
    let completed = app.lessons().completed_lessons().await?;
    let progress = app.lessons().progress().await?;

    println!(
        "{}/{} lessons completed ({}%)",
        progress.overall.completed, progress.overall.total, progress.overall.percent
    );
    for (category, counts) in &progress.by_category {
        println!(
            "  {:<11} {}/{} ({}%)",
            category.label(),
            counts.completed,
            counts.total,
            counts.percent
        );
    }
    for lesson in app.lessons().curriculum().lessons() {
        let mark = if completed.contains(lesson.id()) { "✅" } else { "  " };
        println!(
            "{mark} {:<14} {:<11} {}",
            lesson.id(),
            lesson.category().label(),
            lesson.difficulty().label()
        );
    }
    Ok(())
}

pub async fn complete_lesson(app: &AppServices, lesson_id: &str) -> CommandResult {
    if app.lessons().complete_lesson(lesson_id).await? {
        println!("lesson {lesson_id} completed (+100 XP)");
    } else {
        println!("lesson {lesson_id} was already completed");
    }
    Ok(())
}

pub async fn submit_quiz(app: &AppServices, topic: &str, answers: Vec<u8>) -> CommandResult {
    let submission = app.quizzes().submit(topic, answers).await?;
    println!(
        "submitted {} for review as {}",
        submission.topic, submission.id
    );
    Ok(())
}

pub async fn quiz_status(app: &AppServices, topic: Option<&str>) -> CommandResult {
    match topic {
        Some(topic) => print_overview(&app.quizzes().overview(topic).await?),
        None => {
            for overview in app.quizzes().overviews().await? {
                print_overview(&overview);
            }
        }
    }
    Ok(())
}

pub async fn quiz_result(app: &AppServices, topic: &str) -> CommandResult {
    let Some(result) = app.quizzes().reviewed_result(topic).await? else {
        println!("no reviewed result for {topic} yet");
        return Ok(());
    };

    println!(
        "{}: {}/{} ({}%) {}",
        topic,
        result.score,
        result.total_questions,
        result.percent(),
        if result.passed { "passed" } else { "failed" }
    );
    if let Some(reviewer) = &result.reviewed_by {
        println!("reviewed by {reviewer}");
    }
    if let Some(feedback) = &result.feedback {
        println!("feedback: {feedback}");
    }
    Ok(())
}

pub async fn admin_pending(app: &AppServices, session: &AdminSession) -> CommandResult {
    let pending = app.reviews().pending(session).await?;
    if pending.is_empty() {
        println!("nothing to review");
    }
    for submission in &pending {
        print_submission(submission);
    }
    Ok(())
}

pub async fn admin_stats(app: &AppServices, session: &AdminSession) -> CommandResult {
    let reviews = app.reviews();
    let stats = reviews.stats(session).await?;
    println!(
        "pending {}  reviewed {}  passed {}",
        stats.pending, stats.reviewed, stats.passed
    );

    for submission in reviews.recent_reviews(session).await? {
        let Some(result) = &submission.result else {
            continue;
        };
        println!(
            "{}  {:<10} {}/{}  {}  {}",
            submission.id,
            submission.topic,
            result.score,
            result.total_questions,
            if result.passed { "pass" } else { "fail" },
            result.completed_at.format("%Y-%m-%d %H:%M")
        );
    }
    Ok(())
}

pub async fn admin_show(app: &AppServices, session: &AdminSession, id: &str) -> CommandResult {
    let id = SubmissionId::new(id)?;
    let breakdown = app.reviews().breakdown(session, &id).await?;

    print_submission(&breakdown.submission);
    for check in &breakdown.checks {
        let correct = check
            .correct
            .map_or_else(|| "-".to_owned(), |c| c.to_string());
        println!(
            "  Q{:<3} answer {}  correct {}  {}",
            check.question + 1,
            check.given,
            correct,
            if check.is_correct() { "✅" } else { "❌" }
        );
    }
    println!(
        "score {}/{}  suggested: {}",
        breakdown.score,
        breakdown.total,
        decision_label(breakdown.suggested)
    );
    Ok(())
}

pub async fn admin_grade(
    app: &AppServices,
    session: &AdminSession,
    id: &str,
    decision: ReviewDecision,
    score: Option<u32>,
    feedback: Option<&str>,
) -> CommandResult {
    let id = SubmissionId::new(id)?;
    let result = app
        .reviews()
        .review(session, &id, decision, score, feedback)
        .await?;
    println!(
        "{id}: {} with {}/{}",
        decision_label(decision),
        result.score,
        result.total_questions
    );
    Ok(())
}

pub async fn project(
    app: &AppServices,
    html: &Path,
    css: &Path,
    js: &Path,
    dry_run: bool,
) -> CommandResult {
    let html = std::fs::read_to_string(html)?;
    let css = std::fs::read_to_string(css)?;
    let js = std::fs::read_to_string(js)?;

    let projects = app.projects();
    let report = if dry_run {
        projects.check(&html, &css, &js)
    } else {
        let outcome = projects.submit(&html, &css, &js).await?;
        if outcome.newly_completed {
            println!("final project completed");
        }
        outcome.report
    };

    for message in report.messages() {
        println!("{message}");
    }
    println!(
        "{}/{} checks passed",
        report.passed_count(),
        report.checks().len()
    );
    Ok(())
}

pub async fn profile(app: &AppServices) -> CommandResult {
    let profile = app.progress().profile().await?;
    let level = profile.level;

    println!("{}", profile.name);
    println!(
        "level {}  {} XP  {} XP to next level ({}%)",
        level.level, level.xp, level.xp_to_next_level, level.progress_percent
    );
    println!(
        "lessons {}  quizzes passed {}  average score {}%",
        profile.completed_lessons, profile.passed_quizzes, profile.average_score
    );

    if profile.badges.is_empty() {
        println!("no badges yet");
    }
    for badge in &profile.badges {
        println!("{} {}: {}", badge.icon(), badge.name(), badge.description());
    }

    for (topic, results) in &profile.recent_results {
        for result in results {
            println!(
                "  {:<12} {}/{}  {}",
                topic,
                result.score,
                result.total_questions,
                result.completed_at.format("%Y-%m-%d")
            );
        }
    }

    if profile.can_access_final_project {
        println!("final project unlocked");
    }
    Ok(())
}
