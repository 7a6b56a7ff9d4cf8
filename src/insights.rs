use crate::models::{InsightReport, StudentRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Strength,
    Neutral,
    Weakness,
}

struct Rule {
    strength: &'static str,
    weakness: &'static str,
    recommendation: &'static str,
}

const ACADEMIC: Rule = Rule {
    strength: "Strong academic performance.",
    weakness: "Needs improvement in academic performance.",
    recommendation: "Establish regular study habits and use active recall techniques.",
};

const ATTENDANCE: Rule = Rule {
    strength: "Excellent attendance rate.",
    weakness: "Low attendance rate.",
    recommendation: "Improve attendance by prioritizing classes and managing time effectively.",
};

const CODING: Rule = Rule {
    strength: "Excellent coding skills.",
    weakness: "Limited coding skills.",
    recommendation: "Start with beginner programming courses and practice regularly.",
};

const COMMUNICATION: Rule = Rule {
    strength: "Strong communication skills.",
    weakness: "Needs improvement in communication.",
    recommendation: "Practice public speaking and engage in group discussions.",
};

const LEADERSHIP: Rule = Rule {
    strength: "Excellent leadership qualities.",
    weakness: "Limited leadership experience.",
    recommendation: "Take on leadership roles in student organizations or group projects.",
};

const INTERNSHIP: Rule = Rule {
    strength: "Valuable internship experience.",
    weakness: "No internship experience.",
    recommendation: "Apply for internships or seek part-time work in your field of study.",
};

/// Run every rule against the record. Age feeds the model but has no rule.
pub fn generate_insights(record: &StudentRecord) -> InsightReport {
    let mut report = InsightReport::default();

    let checks = [
        (&ACADEMIC, academic_band(record.average_test_score)),
        (&ATTENDANCE, attendance_band(record.attendance_rate)),
        (&CODING, skill_band(record.coding_skill_score)),
        (&COMMUNICATION, skill_band(record.communication_score)),
        (&LEADERSHIP, skill_band(record.leadership_score)),
        (&INTERNSHIP, internship_band(record.internship_experience)),
    ];

    for (rule, band) in checks {
        match band {
            Band::Strength => report.strengths.push(rule.strength.to_string()),
            Band::Weakness => {
                report.weaknesses.push(rule.weakness.to_string());
                report.recommendations.push(rule.recommendation.to_string());
            }
            Band::Neutral => {}
        }
    }

    report
}

pub fn academic_band(score: f64) -> Band {
    if score >= 85.0 {
        Band::Strength
    } else {
        Band::Weakness
    }
}

pub fn attendance_band(rate: f64) -> Band {
    match rate {
        r if r >= 90.0 => Band::Strength,
        r if r < 75.0 => Band::Weakness,
        _ => Band::Neutral,
    }
}

/// Shared by coding, communication and leadership (0-10 scales).
pub fn skill_band(score: f64) -> Band {
    match score {
        s if s >= 8.0 => Band::Strength,
        s if s < 5.0 => Band::Weakness,
        _ => Band::Neutral,
    }
}

pub fn internship_band(months: f64) -> Band {
    match months {
        m if m >= 6.0 => Band::Strength,
        m if m == 0.0 => Band::Weakness,
        _ => Band::Neutral,
    }
}
