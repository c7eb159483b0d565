//! User-facing copy. The kiosk ships a single Korean locale.

pub const APP_TITLE: &str = "감정 문학 자판기";
pub const APP_TAGLINE: &str = "당신의 표정을 분석하여 어울리는 문학 작품을 처방해드립니다.";

pub const NAME_TITLE: &str = "이름을 알려주세요";
pub const NAME_SUBTITLE: &str = "맞춤형 처방을 위해 당신의 이름을 입력해주세요.";
pub const NAME_PLACEHOLDER: &str = "홍길동";

pub const PHOTO_TITLE: &str = "현재의 표정을 보여주세요";
pub const PHOTO_SUBTITLE: &str = "사진을 업로드하거나 카메라로 촬영해주세요.";
pub const MODE_UPLOAD: &str = "업로드";
pub const MODE_CAMERA: &str = "카메라";
pub const UPLOAD_HINT: &str = "사진 파일 경로를 입력하고 Enter";
pub const CAMERA_HINT: &str = "Space 를 눌러 촬영하기";
pub const CAMERA_CAPTURING: &str = "촬영 중...";
pub const CAMERA_UNAVAILABLE: &str = "카메라를 사용할 수 없습니다.";
pub const RETAKE: &str = "다시 선택";
pub const ANALYZING: &str = "당신의 감정을 읽고 있습니다...";

pub const RESULT_TITLE: &str = "처방전이 도착했습니다";
pub const RESULT_EMPTY: &str = "결과가 없습니다.";
pub const TODAYS_PICK: &str = "오늘의 추천 문학";
pub const AI_COMMENT: &str = "AI 감정 분석 코멘트:";

pub const CLINIC_NAME: &str = "오성 문학의원";
pub const SLIP_KIND: &str = "문학 처방전";
pub const ISSUED_AT: &str = "발급일";
pub const PATIENT: &str = "환자명";
pub const PRESCRIPTION_REASON: &str = "처방 이유";
pub const PLACEHOLDER_DASH: &str = "—";

pub const BUTTON_NEXT: &str = "다음";
pub const BUTTON_ANALYZE: &str = "감정 분석하기";
pub const BUTTON_ANALYZING: &str = "분석 중...";
pub const BUTTON_RESTART: &str = "처음으로";
pub const BUTTON_BACK: &str = "이전";
pub const BUTTON_DONE: &str = "완료";

pub const NO_IMAGE_SELECTED: &str = "이미지를 선택해주세요.";
pub const ANALYSIS_FAILED: &str = "분석 중 오류가 발생했습니다. 다시 시도해주세요.";
pub const FILE_UNREADABLE: &str = "사진 파일을 읽을 수 없습니다.";

/// `{name}님의 현재 기분은 "{emotion}" 인 것 같네요.`
pub fn emotion_sentence(name: &str, emotion: &str) -> String {
    format!("{}님의 현재 기분은 \"{}\" 인 것 같네요.", name, emotion)
}
