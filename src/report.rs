use std::fmt::Write;

use crate::models::{Participation, UserStats};

/// Renders the four report sections from already-reconciled participation
/// data. Pure presentation: nothing here re-reads the log or re-classifies
/// events, so the same input always yields the same text.
pub fn build_report(participation: &Participation) -> String {
    let mut output = String::new();

    let _ = writeln!(output, "** Relatório de uso **");

    let mut never_accessed: Vec<&str> = participation
        .enrolled
        .iter()
        .filter(|name| !participation.stats.contains_key(*name))
        .map(String::as_str)
        .collect();
    never_accessed.sort_unstable();

    let _ = writeln!(output);
    if never_accessed.is_empty() {
        let _ = writeln!(output, "Todos os usuários acessaram o Moodle ao menos uma vez.");
    } else {
        let _ = writeln!(output, "Os seguintes usuários não acessaram o Moodle:");
        for name in &never_accessed {
            let _ = writeln!(output, "\t{name}");
        }
    }

    let mut never_submitted: Vec<&str> = participation
        .stats
        .iter()
        .filter(|(_, stats)| stats.submission_count == 0)
        .map(|(name, _)| name.as_str())
        .collect();
    never_submitted.sort_unstable();

    let _ = writeln!(output);
    if never_submitted.is_empty() {
        let _ = writeln!(
            output,
            "Todos os usuários enviaram ao menos uma atividade ou questionário."
        );
    } else {
        let _ = writeln!(
            output,
            "Os seguintes usuários não enviaram atividades ou questionários."
        );
        for name in &never_submitted {
            let _ = writeln!(output, "\t{name}");
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Número de acessos por usuário:");
    for (name, count) in ranked_by(participation, |stats| stats.access_count) {
        let _ = writeln!(output, "\t{name}: {count}");
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "Número de envios por usuário:");
    for (name, count) in ranked_by(participation, |stats| stats.submission_count) {
        let _ = writeln!(output, "\t{name}: {count}");
    }

    output
}

/// Every stats entry ordered by `key` descending, ties broken by name
/// ascending so repeated runs print identical rankings.
fn ranked_by(
    participation: &Participation,
    key: impl Fn(&UserStats) -> u32,
) -> Vec<(&str, u32)> {
    let mut ranked: Vec<(&str, u32)> = participation
        .stats
        .iter()
        .map(|(name, stats)| (name.as_str(), key(stats)))
        .collect();
    ranked.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    ranked
}
