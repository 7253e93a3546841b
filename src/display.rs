use crate::simulation::Report;
use crate::stats::Summary;

pub fn display_stats(report: &Report) {
    let settings = &report.settings;
    let counters = &report.counters;
    println!(
        "Students/tutors/chairs/helps: {}/{}/{}/{}",
        settings.students, settings.tutors, settings.chairs, settings.helps
    );
    println!("Total requests: {}", counters.total_requests);
    println!("Total sessions tutored: {}", counters.sessions_completed);
    println!("Seat requests rejected: {}", counters.rejections);
    println!("Longest queue: {}", counters.max_waiting);
    println!("Most students tutored at once: {}", counters.max_tutoring);
    println!("Elapsed: {:.2?}", report.elapsed);
}

pub fn display_tutors(report: &Report) {
    let total = report.counters.sessions_completed.max(1);
    println!("Sessions per tutor:");
    for (n, sessions) in report.counters.sessions_per_tutor.iter().enumerate() {
        println!(
            "  - tutor {}: {} ({:.2}%)",
            n + 1,
            sessions,
            100.0 * *sessions as f32 / total as f32
        );
    }
}

pub fn display_priorities(summary: &Summary) {
    let histogram = summary.priority_histogram();
    if histogram.is_empty() {
        return;
    }
    let cumul = histogram.iter().scan(0, |s, &n| {
        *s += n;
        Some(*s)
    });
    println!("Queue entries by priority:");
    for (priority, (n, c)) in histogram.iter().zip(cumul).enumerate() {
        if *n != 0 {
            println!("  - P{}: {} (cumulative {})", priority, n, c);
        }
    }
}

pub fn display_unlucky(summary: &Summary) {
    let rejections = summary.rejections_per_student();
    let mut unlucky = rejections
        .iter()
        .enumerate()
        .filter(|&(_, &n)| n > 0)
        .collect::<Vec<_>>();
    unlucky.sort_by_key(|&(s, &n)| (std::cmp::Reverse(n), s));
    if !unlucky.is_empty() {
        println!("Students who most often found no chair:");
        for (s, n) in unlucky.into_iter().take(5) {
            println!("  - student {}: {}", s + 1, n);
        }
    }
}
