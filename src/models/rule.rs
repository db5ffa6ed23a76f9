//! 압축 규칙 모델
//!
//! 규칙 파일 한 줄이 하나의 규칙이 된다. 규칙 자체는 외부 압축 도구의 경로와
//! 고정 인자, 그리고 결과 파일의 MIME 타입/확장자만 담는다.

use std::path::PathBuf;

/// 인자 목록에서 생성된 압축 파일 이름으로 치환되는 예약 토큰
pub const FILENAME_PLACEHOLDER: &str = "FILENAME";

/// 규칙 파일 필드 구분자
pub const FIELD_SEPARATOR: char = '\t';

/// 외부 압축 도구 설정
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionRule {
    /// 형식 설명 (예: "ZIP compressed file")
    pub description: String,
    /// 변형 설명 (예: "maximum compression"), 비어 있을 수 있음
    pub variant: String,
    /// 결과 파일 MIME 타입
    pub mime_type: String,
    /// 결과 파일 확장자 (점 포함, 예: ".zip")
    pub extension: String,
    /// 압축 도구 실행 파일 경로
    pub executable: PathBuf,
    /// 도구에 넘길 고정 인자 (FILENAME 토큰 포함 가능)
    pub arguments: Vec<String>,
}

impl CompressionRule {
    /// 규칙 파일이 없을 때 쓰는 기본 zip 규칙
    pub fn default_zip() -> Self {
        Self {
            description: "ZIP compressed file".to_string(),
            variant: "maximum compression".to_string(),
            mime_type: "application/x-zip-compressed".to_string(),
            extension: ".zip".to_string(),
            executable: PathBuf::from("/bin/zip"),
            arguments: ["-9", "-r", "-y", FILENAME_PLACEHOLDER]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// 탭으로 구분된 한 줄을 규칙으로 변환
    ///
    /// 필수 필드가 모자라면 `None`.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.strip_suffix('\r').unwrap_or(line);
        let mut fields = line.split(FIELD_SEPARATOR);

        let description = fields.next()?.to_string();
        let variant = fields.next()?.to_string();
        let mime_type = fields.next()?.to_string();
        let extension = fields.next()?.to_string();
        let executable = PathBuf::from(fields.next()?);
        let arguments = fields.map(str::to_string).collect();

        Some(Self {
            description,
            variant,
            mime_type,
            extension,
            executable,
            arguments,
        })
    }

    /// 규칙 파일에 쓰는 형태 (줄바꿈 없음)
    pub fn to_line(&self) -> String {
        let executable = self.executable.to_string_lossy();
        let mut fields: Vec<&str> = vec![
            self.description.as_str(),
            self.variant.as_str(),
            self.mime_type.as_str(),
            self.extension.as_str(),
            &*executable,
        ];
        fields.extend(self.arguments.iter().map(String::as_str));
        fields.join(&FIELD_SEPARATOR.to_string())
    }

    /// 화면 표시용 이름: "설명 [변형]" 또는 변형이 없으면 설명만
    pub fn label(&self) -> String {
        if self.variant.is_empty() {
            self.description.clone()
        } else {
            format!("{} [{}]", self.description, self.variant)
        }
    }

    /// 압축 도구가 디스크에 존재하는지
    pub fn tool_exists(&self) -> bool {
        self.executable.is_file()
    }

    /// 인자 목록에 FILENAME 토큰이 있는지
    pub fn has_placeholder(&self) -> bool {
        self.arguments.iter().any(|arg| arg == FILENAME_PLACEHOLDER)
    }
}
