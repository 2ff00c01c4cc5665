//! Prompt catalog for the OCR and article services.
//!
//! Pure functions from a [`PlatformType`] to prompt text. The OCR extraction
//! prompts define which [`OcrRawInfo`](crate::types::OcrRawInfo) fields the
//! model is asked to fill for each profession.

use crate::types::PlatformType;

/// Asks for the holder's name only.
pub const NAME_PROMPT: &str = "請辨識圖片中證件持有人的姓名，\
    並以 JSON 格式回覆：{\"name\": \"姓名\"}。\
    若無法辨識，name 請填空字串。";

/// System prompt for OCR calls that are not tied to a profession.
pub const OCR_SYSTEM_PROMPT: &str = "你是一位專業的證件文字辨識助理。\
    請只根據圖片中清楚可見的文字作答，不要猜測或補完看不清楚的內容。\
    日期一律轉換為 YYYY-MM-DD 格式（民國年請換算為西元年）。\
    只輸出 JSON 物件，不要加上任何說明文字或 Markdown 標記。";

/// System prompt for OCR calls about `platform` license documents.
pub fn ocr_system_prompt(platform: PlatformType) -> String {
    let document = match platform {
        PlatformType::Doctor => "醫師證書、專科醫師證書或醫院識別證",
        PlatformType::Nurse => "護理師證書、護士證書或醫院識別證",
        PlatformType::Pharmacist => "藥師證書、藥劑生證書或藥局識別證",
    };
    format!("{OCR_SYSTEM_PROMPT}使用者提供的圖片是{document}。")
}

/// Field schema for a full raw-info scan.
pub fn extraction_prompt(platform: PlatformType) -> String {
    let fields = match platform {
        PlatformType::Doctor => {
            "  \"name\": 姓名,\n\
             \x20 \"birthday\": 出生日期,\n\
             \x20 \"position\": 職稱（例如：主治醫師、住院醫師、VS、R）,\n\
             \x20 \"department\": 科別（例如：內科、外科、小兒科）,\n\
             \x20 \"facility\": 服務醫療機構名稱,\n\
             \x20 \"valid_date\": 醫師證書有效期限,\n\
             \x20 \"specialty_valid_date\": 專科醫師證書有效期限"
        }
        PlatformType::Nurse => {
            "  \"name\": 姓名,\n\
             \x20 \"birthday\": 出生日期,\n\
             \x20 \"position\": 職稱（例如：護理師、專科護理師、護理長）,\n\
             \x20 \"department\": 單位（例如：急診、加護病房）,\n\
             \x20 \"facility\": 服務醫療機構名稱,\n\
             \x20 \"valid_date\": 執業執照有效期限"
        }
        PlatformType::Pharmacist => {
            "  \"name\": 姓名,\n\
             \x20 \"birthday\": 出生日期,\n\
             \x20 \"position\": 職稱（例如：藥師、藥劑生）,\n\
             \x20 \"facility\": 執業藥局或醫療機構名稱,\n\
             \x20 \"valid_date\": 執業執照有效期限"
        }
    };
    format!(
        "請從圖片中擷取以下欄位，並以 JSON 物件回覆：\n{{\n{fields}\n}}\n\
         圖片中沒有出現的欄位請省略，不要輸出 null 或空字串。"
    )
}

/// System prompt for extracting structured tags from a job posting.
pub fn extract_tags_system_prompt(platform: PlatformType) -> String {
    let (role, schema) = match platform {
        PlatformType::Doctor => (
            "醫師",
            "  \"工作類別\": [\"全職\" | \"兼職\" | \"支援\" | \"代診\"],\n\
             \x20 \"職稱\": [例如 \"主治醫師\"、\"住院醫師\"],\n\
             \x20 \"科別\": [例如 \"家醫科\"、\"內科\"],\n\
             \x20 \"地區\": [縣市名稱],\n\
             \x20 \"機構類型\": [\"醫學中心\" | \"區域醫院\" | \"地區醫院\" | \"診所\"]",
        ),
        PlatformType::Nurse => (
            "護理人員",
            "  \"工作類別\": [\"全職\" | \"兼職\" | \"約聘\"],\n\
             \x20 \"職稱\": [例如 \"護理師\"、\"專科護理師\"],\n\
             \x20 \"單位\": [例如 \"急診\"、\"病房\"、\"手術室\"],\n\
             \x20 \"班別\": [\"白班\" | \"小夜\" | \"大夜\" | \"輪班\"],\n\
             \x20 \"地區\": [縣市名稱]",
        ),
        PlatformType::Pharmacist => (
            "藥師",
            "  \"工作類別\": [\"全職\" | \"兼職\" | \"支援\"],\n\
             \x20 \"職稱\": [例如 \"藥師\"、\"藥劑生\"],\n\
             \x20 \"執業場所\": [\"醫院\" | \"社區藥局\" | \"診所\" | \"藥廠\"],\n\
             \x20 \"地區\": [縣市名稱]",
        ),
    };
    format!(
        "你是一位{role}徵才文章的分類助理。請閱讀使用者提供的徵才文章，\
         擷取標籤並以 JSON 物件回覆，格式如下：\n{{\n{schema}\n}}\n\
         每個欄位都是字串陣列；文章中沒有提到的欄位請回傳空陣列。\
         只輸出 JSON，不要加上任何說明。"
    )
}

/// System prompt for polishing a job posting into publishable prose.
pub fn polish_system_prompt(platform: PlatformType) -> String {
    let (audience, must_keep) = match platform {
        PlatformType::Doctor => ("醫師", "科別、職稱、看診時段、薪資或保障底薪、聯絡方式"),
        PlatformType::Nurse => ("護理人員", "單位、班別、薪資、福利、聯絡方式"),
        PlatformType::Pharmacist => ("藥師", "執業場所、工作時段、薪資、福利、聯絡方式"),
    };
    format!(
        "你是一位專業的醫療徵才文案編輯，讀者是{audience}。\
         請將使用者提供的徵才文章潤飾為通順、專業且友善的繁體中文，\
         保留所有事實資訊，特別是{must_keep}，不得新增原文沒有的內容。\
         使用條列式整理重點，段落簡潔。只輸出潤飾後的文章本文，不要加上任何說明。"
    )
}
