//! Integration tests for the prosa preprocessing pipeline.

use prosa::{Normalizer, Pipeline, PipelineConfig, Segmenter, TokenKind, Tokenizer};

fn sample_documents() -> Vec<&'static str> {
    vec![
        "Кот. Собака.",
        "<div>Он сказал \"привет\" и ушёл… Потом вернулся!</div>",
        "привет-привет мир. Это т.е. проверка.",
        "Первая строка\n\nВторая строка",
        "Вес посылки 10кг, адрес user@example.com. Ответ пришлют завтра.",
    ]
}

#[test]
fn test_normalize_is_idempotent() {
    let normalizer = Normalizer::new(&PipelineConfig::default());
    for raw in sample_documents() {
        let once = normalizer.clean(raw);
        assert_eq!(normalizer.clean(&once), once, "not idempotent for {raw:?}");
    }
}

#[test]
fn test_token_offsets_are_sound() {
    let normalizer = Normalizer::new(&PipelineConfig::default());
    let tokenizer = Tokenizer::default_config();
    for raw in sample_documents() {
        let text = normalizer.clean(raw);
        for token in tokenizer.tokenize(&text) {
            assert_eq!(
                &text[token.off_start..token.off_end],
                token.wf,
                "offset mismatch in {text:?}"
            );
        }
    }
}

#[test]
fn test_tokens_cover_text_up_to_separators() {
    let normalizer = Normalizer::new(&PipelineConfig::default());
    let tokenizer = Tokenizer::default_config();
    for raw in sample_documents() {
        let text = normalizer.clean(raw);
        let tokens = tokenizer.tokenize(&text);
        let mut pos = 0;
        for token in &tokens {
            let gap = &text[pos..token.off_start];
            assert!(
                gap.chars().all(|c| c == ' ' || c == '\n'),
                "non-separator characters dropped: {gap:?} in {text:?}"
            );
            pos = token.off_end;
        }
        let tail = &text[pos..];
        assert!(tail.chars().all(|c| c == ' ' || c == '\n'));
    }
}

#[test]
fn test_every_sentence_has_a_word() {
    let pipeline = Pipeline::default_config();
    for raw in sample_documents() {
        for sentence in pipeline.process(raw).sentences {
            assert!(
                sentence.words.iter().any(|w| w.kind.is_word()),
                "wordless sentence {:?} from {raw:?}",
                sentence.text
            );
        }
    }
}

#[test]
fn test_ordinals_are_consistent() {
    let pipeline = Pipeline::default_config();
    for raw in sample_documents() {
        for sentence in pipeline.process(raw).sentences {
            let max = sentence
                .words
                .iter()
                .filter_map(|w| w.sentence_index)
                .max()
                .unwrap_or(0);
            for w in &sentence.words {
                if let (Some(idx), Some(neg)) = (w.sentence_index, w.sentence_index_neg) {
                    assert_eq!(idx + neg, max, "ordinal mismatch in {:?}", sentence.text);
                }
            }
        }
    }
}

#[test]
fn test_two_simple_sentences() {
    let pipeline = Pipeline::default_config();
    assert_eq!(
        pipeline.sentence_texts("Кот. Собака."),
        vec!["Кот.", "Собака."]
    );
}

#[test]
fn test_abbreviation_never_breaks_sentence() {
    let config = PipelineConfig::from_json_str(r#"{"abbreviations": ["т.е"]}"#).unwrap();
    let pipeline = Pipeline::new(&config);
    let texts = pipeline.sentence_texts("т.е. Сегодня хорошо.");
    assert_eq!(texts, vec!["т.е. Сегодня хорошо."]);
}

#[test]
fn test_hyphenated_word_stays_one_token() {
    let pipeline = Pipeline::default_config();
    let doc = pipeline.process("привет-привет мир");
    assert_eq!(doc.sentences.len(), 1);
    let words: Vec<&str> = doc.sentences[0]
        .words
        .iter()
        .map(|w| w.wf.as_str())
        .collect();
    assert_eq!(words, vec!["привет-привет", "мир"]);
}

#[test]
fn test_isolated_punct_run_merges_into_previous_sentence() {
    let pipeline = Pipeline::default_config();
    // The "?" closes as a sentence of its own (its preceding break is
    // valid) but holds no words, so it folds back into the previous
    // sentence with the source gap preserved.
    let doc = pipeline.process("Кот! ? Собака.");
    let texts: Vec<&str> = doc.sentences.iter().map(|s| s.text.as_str()).collect();
    assert_eq!(texts, vec!["Кот! ?", "Собака."]);
    assert!(doc.sentences[0].words.iter().any(|w| w.kind.is_word()));
}

#[test]
fn test_trailing_punct_run_never_forms_wordless_sentence() {
    let pipeline = Pipeline::default_config();
    let doc = pipeline.process("Собака лает. !!");
    assert_eq!(doc.sentences.len(), 1);
    assert!(doc.sentences[0].text.ends_with("!!"));
    assert!(doc.sentences[0].words.iter().any(|w| w.kind.is_word()));
}

#[test]
fn test_email_survives_as_one_token() {
    let config = PipelineConfig::from_json_str(
        r#"{"special_tokens": {"[\\w.-]+@[\\w.-]+\\.\\w+": {}}}"#,
    )
    .unwrap();
    let pipeline = Pipeline::new(&config);
    let doc = pipeline.process("пишите на user.name@example.com до пятницы");
    let words: Vec<&str> = doc.sentences[0]
        .words
        .iter()
        .map(|w| w.wf.as_str())
        .collect();
    assert!(words.contains(&"user.name@example.com"));
}

#[test]
fn test_full_settings_file_shape() {
    // A settings file in the shape the indexing collaborators feed in:
    // unknown keys are ignored, every recognized key is honored.
    let config = PipelineConfig::from_json_str(
        r#"{
            "corpus_name": "oscar_ru",
            "elastic_url": "localhost:9200",
            "split_tokens": ["(\\d+)(кг)"],
            "special_tokens": {":-?\\)": {"wtype": "emoticon"}},
            "abbreviations": ["т.е", "и.о"],
            "sent_end_punc": "[.?!]",
            "sent_start": "[A-ZА-ЯЁ]",
            "newline_ends_sent": true,
            "convert_quotes": true,
            "left_quot_mark": "«",
            "right_quot_mark": "»"
        }"#,
    )
    .unwrap();
    let pipeline = Pipeline::new(&config);
    let doc = pipeline.process("Вес 10кг сегодня :-) Приходите!");
    let words: Vec<&str> = doc
        .sentences
        .iter()
        .flat_map(|s| s.words.iter())
        .map(|w| w.wf.as_str())
        .collect();
    assert!(words.contains(&"10"));
    assert!(words.contains(&"кг"));
    assert!(words.contains(&":-)"));
    let emoticon = doc
        .sentences
        .iter()
        .flat_map(|s| s.words.iter())
        .find(|w| w.wf == ":-)")
        .unwrap();
    assert_eq!(emoticon.kind, TokenKind::Custom("emoticon".to_string()));
}

#[test]
fn test_sentence_json_shape() {
    let pipeline = Pipeline::default_config();
    let doc = pipeline.process("Кот спит.");
    let json = serde_json::to_value(&doc.sentences[0]).unwrap();
    assert_eq!(json["text"], "Кот спит.");
    assert_eq!(json["words"][0]["wf"], "Кот");
    assert_eq!(json["words"][0]["wtype"], "word");
    assert_eq!(json["words"][0]["off_start"], 0);
    assert_eq!(json["words"][2]["wtype"], "punct");
}

#[test]
fn test_markup_heavy_document() {
    let pipeline = Pipeline::default_config();
    let raw = "<html><head></head><body><p>Первое предложение.</p> \
               <p>Второе&nbsp;предложение!</p></body></html>";
    let texts = pipeline.sentence_texts(raw);
    assert_eq!(texts, vec!["Первое предложение.", "Второе предложение!"]);
}

#[test]
fn test_degenerate_inputs_never_fail() {
    let pipeline = Pipeline::default_config();
    for raw in ["", " ", "\n\n\n", "...", "<p></p>", "\\\\\\"] {
        let doc = pipeline.process(raw);
        for sentence in &doc.sentences {
            assert!(!sentence.words.is_empty());
        }
    }
}

#[test]
fn test_segmenter_matches_splitter_contract() {
    // Direct segmenter use over externally produced tokens.
    let config = PipelineConfig::default();
    let tokenizer = Tokenizer::new(&config);
    let segmenter = Segmenter::new(&config);
    let text = "Он пришёл? Да!";
    let sentences = segmenter.split(&tokenizer.tokenize(text), text);
    assert_eq!(sentences.len(), 2);
    assert_eq!(sentences[0].text, "Он пришёл?");
    assert_eq!(sentences[1].text, "Да!");
}
