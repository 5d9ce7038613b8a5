use super::domain::StudentRecord;
use super::import::{
    CLASS_COLUMN, NAME_COLUMN, PART_A_COLUMN, PART_B_COLUMN, STUDENT_ID_COLUMN,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SAMPLE_SEED: u64 = 42;

const SURNAMES: [&str; 20] = [
    "Chan", "Wong", "Lee", "Lam", "Cheung", "Ho", "Ng", "Yip", "Tsang", "Liu", "Fong", "Kwok",
    "Tang", "Chow", "Ma", "Siu", "Yuen", "Leung", "Mak", "Lo",
];

const GIVEN_NAMES: [&str; 20] = [
    "Ka Ming", "Wai Yan", "Chun Kit", "Hoi Ching", "Tsz Ying", "Ka Ho", "Wing Sze", "Yat Long",
    "Sum Yu", "Cheuk Hei", "Mei Ling", "Tin Lok", "Sze Wai", "Kwan Ho", "Yuen Ting", "Chi Keung",
    "Hiu Tung", "Man Hei", "Pui Shan", "Ho Yin",
];

const CLASS_NAMES: [&str; 5] = ["Class 1", "Class 2", "Class 3", "Class 4", "Class 5"];

/// Deterministic demo roster: seeded names and classes, part scores on
/// rough bell curves clipped to each part's domain, one decimal place.
pub fn generate_sample(count: usize, seed: u64) -> Vec<StudentRecord> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..count)
        .map(|index| {
            let name = format!(
                "{} {}",
                SURNAMES[rng.gen_range(0..SURNAMES.len())],
                GIVEN_NAMES[rng.gen_range(0..GIVEN_NAMES.len())]
            );
            let class_name = CLASS_NAMES[rng.gen_range(0..CLASS_NAMES.len())].to_string();
            let part_a = clipped_normal(&mut rng, 35.0, 8.0, 0.0, 50.0);
            let part_b = clipped_normal(&mut rng, 75.0, 15.0, 0.0, 103.0);

            StudentRecord {
                name,
                student_id: format!("2024{:04}", index + 1),
                class_name,
                part_a: format!("{part_a:.1}"),
                part_b: format!("{part_b:.1}"),
            }
        })
        .collect()
}

/// Serializes a roster back to CSV with the required column labels.
pub fn to_csv(records: &[StudentRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record([
        NAME_COLUMN,
        STUDENT_ID_COLUMN,
        CLASS_COLUMN,
        PART_A_COLUMN,
        PART_B_COLUMN,
    ])?;
    for record in records {
        writer.write_record([
            &record.name,
            &record.student_id,
            &record.class_name,
            &record.part_a,
            &record.part_b,
        ])?;
    }
    writer
        .into_inner()
        .map_err(|err| csv::Error::from(err.into_error()))
}

// Sum of twelve unit uniforms has mean 6 and unit variance, close
// enough to Gaussian for demo data.
fn clipped_normal(rng: &mut StdRng, mean: f64, std_dev: f64, min: f64, max: f64) -> f64 {
    let sum: f64 = (0..12).map(|_| rng.gen::<f64>()).sum();
    (mean + (sum - 6.0) * std_dev).clamp(min, max)
}
