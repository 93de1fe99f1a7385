use statement_core::{Classification, Grade};

const GRADE_FLOORS: [(u32, Grade); 5] = [
    (85, Grade::APlus),
    (70, Grade::A),
    (55, Grade::B),
    (40, Grade::C),
    (25, Grade::D),
];

/// Letter grade for a global score. Floors are inclusive.
pub fn grade_for(global_score: u32) -> Grade {
    GRADE_FLOORS
        .iter()
        .find(|(floor, _)| global_score >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or(Grade::E)
}

fn conclusion(global_score: u32) -> &'static str {
    if global_score >= 70 {
        "La situation financière de l'entreprise est satisfaisante selon les normes BCEAO. \
         Les indicateurs montrent une bonne maîtrise de la gestion financière."
    } else if global_score >= 40 {
        "La situation financière présente quelques faiblesses qui nécessitent une attention \
         particulière. Des améliorations ciblées permettront de renforcer la position financière."
    } else {
        "La situation financière nécessite des actions correctives urgentes. \
         Un plan de redressement doit être mis en place rapidement."
    }
}

pub fn classify(global_score: u32) -> Classification {
    let grade = grade_for(global_score);
    Classification {
        grade,
        interpretation: grade.interpretation().to_string(),
        conclusion: conclusion(global_score).to_string(),
    }
}
