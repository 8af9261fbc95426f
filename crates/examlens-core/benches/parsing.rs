use criterion::{black_box, criterion_group, criterion_main, Criterion};

use examlens_core::engine::QueryEngine;
use examlens_core::model::{StudentInsightRecord, TestInsightRecord};
use examlens_core::parser::{parse_cohort_zone, parse_stage, parse_student_zone};
use examlens_core::repository::InsightSnapshot;

const STUDENT_STAGE: &str = "SUP Score (Score Uplift Potential): 45

What will go wrong
* Algebra accuracy below 40% will cap the quant score
* RC passages take more than 8 minutes each
* Easy arithmetic questions are being skipped
* Vocabulary errors creep in under time pressure

What exactly to fix
* Two weeks of algebra fundamentals
* Timed RC drills, one passage per day
* Attempt every arithmetic question first

SUP Score (Score Uplift Potential): 45";

const BATCH_STAGE: &str = "SUP Score (Score Uplift Potential): 30

What will go wrong
* Geometry is the new bottleneck for the cohort

What exactly to fix
* Daily formula drills
* Sectional geometry tests every weekend
";

fn bench_parse_stage(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_stage");

    let large = {
        let mut s = String::from("What will go wrong\n");
        for i in 0..200 {
            s.push_str(&format!("* predictive item {i}\n"));
        }
        s.push_str("\nWhat exactly to fix\n");
        for i in 0..200 {
            s.push_str(&format!("* prescriptive item {i}\n"));
        }
        s
    };

    group.bench_function("student_format", |b| {
        b.iter(|| parse_stage(black_box(Some(STUDENT_STAGE))))
    });

    group.bench_function("batch_fallback", |b| {
        b.iter(|| parse_stage(black_box(Some(BATCH_STAGE))))
    });

    group.bench_function("400_bullets", |b| {
        b.iter(|| parse_stage(black_box(Some(large.as_str()))))
    });

    group.finish();
}

fn bench_parse_zones(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_zone");

    let student = "- Algebra word problems\n- RC inference\n- Data sufficiency\n- Probability";
    let cohort = "Algebra word problems\n\nRC inference\nData sufficiency\nProbability\n";

    group.bench_function("student", |b| {
        b.iter(|| parse_student_zone(black_box(Some(student))))
    });

    group.bench_function("cohort", |b| {
        b.iter(|| parse_cohort_zone(black_box(Some(cohort))))
    });

    group.finish();
}

fn bench_student_insight(c: &mut Criterion) {
    let mut group = c.benchmark_group("student_insight");

    for size in [10usize, 100, 1000] {
        let snapshot = generate_snapshot(size);
        let last = format!("student-{}", size - 1);
        group.bench_function(format!("{size}_students"), |b| {
            let engine = QueryEngine::new(&snapshot);
            b.iter(|| engine.student_insight(black_box(&last), black_box("Mock 3")))
        });
    }

    group.finish();
}

fn generate_snapshot(students: usize) -> InsightSnapshot {
    let mut snapshot = InsightSnapshot::default();
    for i in 0..students {
        let key = format!("student-{i}");
        snapshot.students.push(StudentInsightRecord {
            student_key: key.clone(),
            early_stage: STUDENT_STAGE.to_string(),
            mid_course_stage: STUDENT_STAGE.to_string(),
            pre_exam_stage: BATCH_STAGE.to_string(),
        });
        for exam in 1..=5 {
            snapshot.tests.push(TestInsightRecord {
                student_key: key.clone(),
                exam_key: format!("Mock {exam}"),
                focus_text: "- Algebra\n- Geometry".to_string(),
                study_text: "- Vocabulary".to_string(),
            });
        }
    }
    snapshot
}

criterion_group!(
    benches,
    bench_parse_stage,
    bench_parse_zones,
    bench_student_insight
);
criterion_main!(benches);
