//! Clinical phrase vocabulary and rule tables.
//!
//! One consolidated phrase→symptom table serves both the symptom-extraction
//! stage and the planner's note-text rescan, so the two call sites cannot
//! drift apart. All scans are literal substring matches over lower-cased
//! text — no tokenization, stemming, or negation handling. Detection order
//! follows table order, not position in the input.

/// Phrase → canonical symptom token. Phrases must be lowercase.
pub const SYMPTOM_PHRASES: &[(&str, &str)] = &[
    // Chest pain
    ("chest pain", "chest pain"),
    ("pain in chest", "chest pain"),
    ("heaviness in chest", "chest pain"),
    ("tightness in chest", "chest pain"),
    ("pressure in chest", "chest pain"),
    ("chest discomfort", "chest pain"),
    // Shortness of breath
    ("shortness of breath", "shortness of breath"),
    ("sob", "shortness of breath"),
    ("breathlessness", "shortness of breath"),
    ("breathless", "shortness of breath"),
    ("difficulty breathing", "shortness of breath"),
    ("cannot breathe", "shortness of breath"),
    ("wheezing", "shortness of breath"),
    // Fever
    ("fever", "fever"),
    ("high temperature", "fever"),
    ("running temperature", "fever"),
    ("felt hot", "fever"),
    // Cough
    ("cough", "cough"),
    ("coughing", "cough"),
    ("dry cough", "cough"),
    ("productive cough", "cough"),
    // Headache
    ("headache", "headache"),
    ("pain in head", "headache"),
    ("migraine", "headache"),
    ("throbbing headache", "headache"),
    // Vomiting / nausea
    ("vomiting", "vomiting"),
    ("vomit", "vomiting"),
    ("threw up", "vomiting"),
    ("throwing up", "vomiting"),
    ("nausea", "vomiting"),
    ("feel like vomiting", "vomiting"),
    // Abdominal pain
    ("abdominal pain", "abdominal pain"),
    ("stomach pain", "abdominal pain"),
    ("tummy pain", "abdominal pain"),
    ("gastric pain", "abdominal pain"),
    ("pain in abdomen", "abdominal pain"),
    // Diarrhoea
    ("loose stools", "diarrhoea"),
    ("loose motions", "diarrhoea"),
    ("diarrhea", "diarrhoea"),
    ("diarrhoea", "diarrhoea"),
    // Constipation
    ("constipation", "constipation"),
    ("hard stools", "constipation"),
    ("difficulty passing motion", "constipation"),
    // Urinary symptoms
    ("burning urination", "uti"),
    ("burning while passing urine", "uti"),
    ("painful urination", "uti"),
    ("frequent urination", "uti"),
    ("urine frequency", "uti"),
    ("blood in urine", "uti"),
    // Dizziness
    ("dizziness", "dizziness"),
    ("giddiness", "dizziness"),
    ("feel like spinning", "dizziness"),
    ("vertigo", "dizziness"),
    ("light headed", "dizziness"),
    // Syncope
    ("fainted", "syncope"),
    ("lost consciousness", "syncope"),
    ("passed out", "syncope"),
    ("blackout", "syncope"),
    // Palpitations
    ("palpitations", "palpitations"),
    ("heart racing", "palpitations"),
    ("heart beating fast", "palpitations"),
    ("pounding heart", "palpitations"),
    // Leg edema
    ("leg swelling", "leg edema"),
    ("swollen legs", "leg edema"),
    ("pedal edema", "leg edema"),
    ("ankle swelling", "leg edema"),
    // Neurological red flags
    ("weakness of one side", "focal weakness"),
    ("weakness on one side", "focal weakness"),
    ("slurred speech", "slurred speech"),
    ("difficulty speaking", "slurred speech"),
    ("sudden vision loss", "visual loss"),
    // Diabetes
    ("diabetes", "diabetes"),
    ("type 2 diabetes", "diabetes"),
    ("type ii diabetes", "diabetes"),
    ("high blood sugar", "diabetes"),
    ("sugar is high", "diabetes"),
    // Hypertension
    ("hypertension", "hypertension"),
    ("high blood pressure", "hypertension"),
    ("bp is high", "hypertension"),
    ("pressure is high", "hypertension"),
    // Anemia
    ("anemia", "anemia"),
    ("anaemia", "anemia"),
    ("low hemoglobin", "anemia"),
    ("hb is low", "anemia"),
    // Pregnancy
    ("pregnant", "pregnancy"),
    ("missed period", "pregnancy"),
    ("positive pregnancy test", "pregnancy"),
];

/// Canonical symptom → standard recommended investigations.
pub const STANDARD_TESTS: &[(&str, &[&str])] = &[
    (
        "chest pain",
        &[
            "ECG 12-lead",
            "Cardiac Troponin I",
            "CK-MB",
            "Lipid Profile",
            "Chest X-Ray (PA view)",
            "Serum Electrolytes",
            "Echocardiogram",
        ],
    ),
    (
        "shortness of breath",
        &[
            "Chest X-Ray (PA view)",
            "Arterial Blood Gas (ABG)",
            "D-Dimer",
            "CBC with Differential",
            "HRCT Thorax",
            "NT-proBNP",
        ],
    ),
    (
        "fever",
        &[
            "CBC with Differential",
            "C-Reactive Protein (CRP)",
            "ESR",
            "Dengue NS1 / IgM",
            "Malaria Smear / Rapid Test",
            "Blood Culture",
            "Urine Routine and Microscopy",
            "Procalcitonin",
        ],
    ),
    (
        "cough",
        &[
            "Chest X-Ray (PA view)",
            "CBC with Differential",
            "C-Reactive Protein (CRP)",
            "Sputum Culture and Sensitivity",
            "COVID-19 RT-PCR",
            "Sputum AFB (for Tuberculosis)",
        ],
    ),
    (
        "headache",
        &[
            "MRI Brain (as indicated)",
            "CT Brain (Non-contrast, if emergency)",
            "CBC with Differential",
            "Serum Electrolytes",
            "ESR",
        ],
    ),
    (
        "vomiting",
        &[
            "CBC with Differential",
            "Serum Electrolytes",
            "Random Blood Sugar",
            "Serum Amylase",
            "Serum Lipase",
            "Liver Function Test (LFT)",
            "Ultrasound Abdomen",
        ],
    ),
    (
        "abdominal pain",
        &[
            "CBC with Differential",
            "Liver Function Test (LFT)",
            "Serum Amylase",
            "Serum Lipase",
            "Ultrasound Abdomen",
            "Stool Routine and Occult Blood",
        ],
    ),
    (
        "diabetes",
        &[
            "HbA1c",
            "Fasting Plasma Glucose",
            "Postprandial Blood Sugar",
            "Lipid Profile",
            "Urine Microalbumin",
            "Renal Function Test (RFT)",
        ],
    ),
    (
        "hypertension",
        &[
            "Serum Electrolytes",
            "ECG 12-lead",
            "Echocardiogram",
            "Renal Doppler Ultrasound",
            "Urine Routine and Microscopy",
        ],
    ),
];

/// Red-flag phrases. Any occurrence mandates human review before the
/// workflow may auto-complete.
pub const RED_FLAG_PHRASES: &[&str] = &[
    "severe chest pain",
    "shortness of breath",
    "loss of consciousness",
    "suicidal",
    "stroke",
];

/// Keyword → investigation display name, for scanning retrieved guideline
/// snippets. Every variant of the same investigation maps to the one display
/// name the rule tables use, so cross-source deduplication holds.
pub const RETRIEVAL_TEST_KEYWORDS: &[(&str, &str)] = &[
    ("cbc", "CBC with Differential"),
    ("ecg", "ECG 12-lead"),
    ("x-ray", "Chest X-Ray (PA view)"),
    ("xray", "Chest X-Ray (PA view)"),
    ("chest x-ray", "Chest X-Ray (PA view)"),
    ("abg", "Arterial Blood Gas (ABG)"),
    ("d-dimer", "D-Dimer"),
    ("lipid", "Lipid Profile"),
    ("urine", "Urine Routine and Microscopy"),
    ("hba1c", "HbA1c"),
    ("glucose", "Fasting / Random Blood Glucose"),
    ("ct", "CT Scan (site as clinically indicated)"),
    ("mri", "MRI (site as clinically indicated)"),
    ("ultrasound", "Ultrasound (region as clinically indicated)"),
    ("spirometry", "Spirometry (Pulmonary Function Test)"),
    ("spiro", "Spirometry (Pulmonary Function Test)"),
    ("rft", "Renal Function Test (RFT)"),
    ("lft", "Liver Function Test (LFT)"),
    ("esr", "ESR"),
    ("crp", "C-Reactive Protein (CRP)"),
    ("procalcitonin", "Procalcitonin"),
    ("troponin", "Cardiac Troponin I"),
];

/// Scan free text for known symptom phrases.
///
/// Returns canonical tokens deduplicated by first occurrence, in table order.
/// Empty input yields an empty list, never an error.
pub fn canonical_symptoms_in(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut detected: Vec<&'static str> = Vec::new();
    for &(phrase, canonical) in SYMPTOM_PHRASES {
        if lower.contains(phrase) && !detected.contains(&canonical) {
            detected.push(canonical);
        }
    }
    detected
}

/// Standard investigations for one canonical symptom (case-normalized).
pub fn tests_for_symptom(symptom: &str) -> &'static [&'static str] {
    let key = symptom.to_lowercase();
    STANDARD_TESTS
        .iter()
        .find(|(s, _)| *s == key)
        .map(|(_, tests)| *tests)
        .unwrap_or(&[])
}

/// Red-flag phrases present in the given text (lower-cased scan).
pub fn red_flags_in(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    RED_FLAG_PHRASES
        .iter()
        .copied()
        .filter(|kw| lower.contains(kw))
        .collect()
}

/// Investigation display names whose keyword occurs in a guideline snippet.
/// Deduplicated by display name — keyword variants collapse to one entry.
pub fn tests_in_snippet(text: &str) -> Vec<&'static str> {
    let lower = text.to_lowercase();
    let mut found: Vec<&'static str> = Vec::new();
    for &(keyword, display) in RETRIEVAL_TEST_KEYWORDS {
        if lower.contains(keyword) && !found.contains(&display) {
            found.push(display);
        }
    }
    found
}
