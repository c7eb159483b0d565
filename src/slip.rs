//! Prescription slip
//!
//! The result view: a recommendation laid out like a pharmacy receipt.
//! [`PrescriptionSlip::lines`] produces width-wrapped, kind-tagged lines so
//! the TUI can style them and the one-shot command can print them as-is.

use chrono::NaiveDate;
use unicode_width::UnicodeWidthStr;

use crate::analysis::AnalysisResult;
use crate::locale;
use crate::utils::{center, wrap_text};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlipLineKind {
    Clinic,
    Title,
    Meta,
    Rule,
    Label,
    Body,
    Footer,
    Blank,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlipLine {
    pub kind: SlipLineKind,
    pub text: String,
}

impl SlipLine {
    fn new(kind: SlipLineKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrescriptionSlip {
    patient: String,
    issued: NaiveDate,
    title: String,
    content: String,
    reason: String,
    author: String,
    genre: String,
    emotion: String,
}

impl PrescriptionSlip {
    pub fn new(name: &str, result: &AnalysisResult, issued: NaiveDate) -> Self {
        let rec = &result.recommendation;
        Self {
            patient: name.trim().to_string(),
            issued,
            title: rec.title.trim().to_string(),
            content: rec.content.trim().to_string(),
            reason: result.analysis.reason.trim().to_string(),
            author: rec.author.trim().to_string(),
            genre: rec.genre.trim().to_string(),
            emotion: result.analysis.detected_emotion.clone(),
        }
    }

    /// Slip dated today in local time
    pub fn issued_today(name: &str, result: &AnalysisResult) -> Self {
        Self::new(name, result, chrono::Local::now().date_naive())
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn emotion(&self) -> &str {
        &self.emotion
    }

    pub fn patient_display(&self) -> &str {
        or_dash(&self.patient)
    }

    pub fn issued_line(&self) -> String {
        format!(
            "{} · {} {}",
            locale::SLIP_KIND,
            locale::ISSUED_AT,
            self.issued.format("%Y-%m-%d")
        )
    }

    /// `author · genre`, omitting whichever is empty
    pub fn byline(&self) -> String {
        match (self.author.is_empty(), self.genre.is_empty()) {
            (false, false) => format!("{} · {}", self.author, self.genre),
            (false, true) => self.author.clone(),
            (true, false) => self.genre.clone(),
            (true, true) => locale::PLACEHOLDER_DASH.to_string(),
        }
    }

    pub fn emotion_sentence(&self) -> String {
        locale::emotion_sentence(&self.patient, &self.emotion)
    }

    pub fn lines(&self, width: usize) -> Vec<SlipLine> {
        let width = width.max(8);
        let mut lines = Vec::new();

        lines.push(SlipLine::new(
            SlipLineKind::Clinic,
            center(locale::CLINIC_NAME, width),
        ));
        lines.push(SlipLine::new(SlipLineKind::Rule, "=".repeat(width)));
        for l in wrap_text(or_dash(&self.title), width) {
            lines.push(SlipLine::new(SlipLineKind::Title, l));
        }
        for l in wrap_text(&self.issued_line(), width) {
            lines.push(SlipLine::new(SlipLineKind::Meta, l));
        }
        lines.push(SlipLine::new(SlipLineKind::Rule, "-".repeat(width)));

        let patient = format!("{}: {}", locale::PATIENT, self.patient_display());
        for l in wrap_text(&patient, width) {
            lines.push(SlipLine::new(SlipLineKind::Meta, l));
        }
        lines.push(SlipLine::new(SlipLineKind::Rule, "-".repeat(width)));

        for l in wrap_text(or_dash(&self.content), width) {
            lines.push(SlipLine::new(SlipLineKind::Body, l));
        }
        lines.push(SlipLine::new(SlipLineKind::Blank, ""));

        lines.push(SlipLine::new(
            SlipLineKind::Label,
            locale::PRESCRIPTION_REASON,
        ));
        for l in wrap_text(or_dash(&self.reason), width) {
            lines.push(SlipLine::new(SlipLineKind::Body, l));
        }
        lines.push(SlipLine::new(SlipLineKind::Rule, "-".repeat(width)));

        for l in wrap_text(&self.byline(), width) {
            lines.push(SlipLine::new(SlipLineKind::Footer, l));
        }
        for l in wrap_text(&self.emotion_sentence(), width) {
            lines.push(SlipLine::new(SlipLineKind::Footer, l));
        }
        lines
    }

    /// Plain-text slip, every line at most `width` columns
    pub fn render_plain(&self, width: usize) -> String {
        let mut out = String::new();
        for line in self.lines(width) {
            out.push_str(line.text.trim_end());
            out.push('\n');
        }
        out
    }

    /// Widest line `lines(width)` can produce
    pub fn max_line_width(&self, width: usize) -> usize {
        self.lines(width)
            .iter()
            .map(|l| l.text.width())
            .max()
            .unwrap_or(0)
    }
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() {
        locale::PLACEHOLDER_DASH
    } else {
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::{Analysis, Recommendation};

    fn result(title: &str, content: &str, reason: &str) -> AnalysisResult {
        AnalysisResult {
            analysis: Analysis {
                detected_emotion: "joy".to_string(),
                reason: reason.to_string(),
            },
            recommendation: Recommendation {
                title: title.to_string(),
                author: "A. Writer".to_string(),
                genre: "소설".to_string(),
                content: content.to_string(),
            },
        }
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 14).unwrap()
    }

    #[test]
    fn test_slip_contains_result_verbatim() {
        let slip = PrescriptionSlip::new("kim", &result("Sample Book", "text", "smile"), date());
        let text = slip.render_plain(40);
        assert!(text.contains("Sample Book"));
        assert!(text.contains("\"joy\""));
        assert!(text.contains("오성 문학의원"));
        assert!(text.contains("문학 처방전 · 발급일 2026-03-14"));
        assert!(text.contains("환자명: kim"));
        assert!(text.contains("A. Writer · 소설"));
        assert!(text.contains("처방 이유"));
    }

    #[test]
    fn test_emotion_sentence() {
        let slip = PrescriptionSlip::new("  민지 ", &result("T", "c", "r"), date());
        assert_eq!(
            slip.emotion_sentence(),
            "민지님의 현재 기분은 \"joy\" 인 것 같네요."
        );
    }

    #[test]
    fn test_empty_fields_show_dash() {
        let slip = PrescriptionSlip::new("   ", &result("", "", ""), date());
        assert_eq!(slip.patient_display(), "—");
        let lines = slip.lines(30);
        let body: Vec<_> = lines
            .iter()
            .filter(|l| l.kind == SlipLineKind::Body)
            .map(|l| l.text.as_str())
            .collect();
        assert_eq!(body, vec!["—", "—"]);
        assert!(lines.iter().any(|l| l.kind == SlipLineKind::Title && l.text == "—"));
    }

    #[test]
    fn test_byline_variants() {
        let mut r = result("T", "c", "r");
        r.recommendation.genre.clear();
        assert_eq!(PrescriptionSlip::new("k", &r, date()).byline(), "A. Writer");
        r.recommendation.author.clear();
        assert_eq!(PrescriptionSlip::new("k", &r, date()).byline(), "—");
    }

    #[test]
    fn test_render_plain_respects_width() {
        let long = "오늘 같은 날에는 천천히 걸으며 바람을 느껴보세요. ".repeat(6);
        let slip = PrescriptionSlip::new("kim", &result("A Long Title Indeed", &long, &long), date());
        for line in slip.render_plain(32).lines() {
            assert!(line.width() <= 32, "too wide: {:?}", line);
        }
        assert!(slip.max_line_width(32) <= 32);
    }
}
