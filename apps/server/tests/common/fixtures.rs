//! Test fixtures for question banks and requests.

use std::path::PathBuf;

use serde_json::{json, Value};

use quiz_runner_server::config::Config;

/// Five questions: 1 and 4 important, 2 multiple choice, 3 short answer.
pub const SAMPLE_BANK: &str = "\
## *第 1 題【單選題】
**English:** Which keyword declares an immutable binding?
**中文：** 哪個關鍵字宣告不可變綁定？
**選項：**
- A. let (讓)
- B. mut (可變)
**正確答案：A**

---

## 第 2 題【多選題】
**English:** Which types are Copy?
**中文：** 哪些型別實作 Copy？
**選項：**
- A. i32
- B. String
- C. bool
**正確答案：A, C**
**題目解析**
Heap-owning types are not Copy.

---

## 第 3 題【簡答題】
**English:** Explain borrowing.
**中文：** 解釋借用。
**參考答案**
References without ownership.

---

## *第 4 題【單選題】
**English:** Which macro prints a line?
**中文：** 哪個巨集會印出一行？
![圖片](images/println.png)
**選項：**
- A. print!
- B. println!
**正確答案：B**

---

## 第 5 題【單選題】
**English:** Which file declares dependencies?
**中文：** 哪個檔案宣告相依套件？
**選項：**
- A. main.rs
- B. lib.rs
- C. Cargo.toml
**正確答案：C**
";

/// A second document continuing the sample bank.
pub const EXTRA_BANK: &str = "\
## 第 6 題【單選題】
**English:** Which command builds a crate?
**中文：** 哪個指令建置 crate？
**選項：**
- A. cargo build
- B. cargo fetch
**正確答案：A**
";

pub fn test_config(bank_paths: Vec<PathBuf>) -> Config {
    Config {
        bank_paths,
        db_path: PathBuf::from(":memory:"),
        host: "127.0.0.1".to_string(),
        port: 0,
    }
}

/// Body for POST /api/answers with option letters.
pub fn choice(letters: &str) -> Value {
    json!({ "letters": letters })
}

/// Body for POST /api/answers with a self-assessment.
pub fn self_assessment(outcome: &str) -> Value {
    json!({ "outcome": outcome })
}

/// Body for POST /api/navigation/jump.
pub fn jump(number: u32) -> Value {
    json!({ "number": number })
}

/// Write `content` to a unique file under the system temp directory.
pub async fn write_temp_bank(name: &str, content: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("quiz-runner-tests-{}", std::process::id()));
    tokio::fs::create_dir_all(&dir)
        .await
        .expect("Failed to create temp dir");
    let path = dir.join(name);
    tokio::fs::write(&path, content)
        .await
        .expect("Failed to write temp bank");
    path
}
