//! [`SqliteStore`] — the SQLite implementation of [`GuidanceStore`].

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::OptionalExtension as _;

use arah_core::{
  catalog::{
    Career, CareerId, Interest, InterestId, NewCareer, NewInterest, NewSkill,
    Skill, SkillId,
  },
  consultation::{
    AnswerRecord, Consultation, ConsultationId, NewConsultation, UserId,
  },
  rule::{CareerRuleSet, NewRuleSet, Rule, RuleId},
  store::GuidanceStore,
};

use crate::{
  Error, Result,
  encode::{
    RawAnswer, RawConsultation, encode_dt, encode_interest_ids, encode_result,
    encode_skill_ids,
  },
  schema::SCHEMA,
};

// ─── ID generation ───────────────────────────────────────────────────────────

/// Allocate the next prefixed sequential ID for `table` (`MIN01`,
/// `KAR03`, …). The next number comes from the maximum numeric suffix,
/// so the sequence stays correct past two digits even though short IDs
/// are zero-padded.
fn next_id(
  conn: &rusqlite::Connection,
  table: &str,
  prefix: &str,
) -> rusqlite::Result<String> {
  // All prefixes are three characters; the suffix starts at position 4.
  let sql = format!(
    "SELECT COALESCE(MAX(CAST(substr(id, 4) AS INTEGER)), 0) FROM {table}"
  );
  let last: i64 = conn.query_row(&sql, [], |row| row.get(0))?;
  Ok(format!("{prefix}{:02}", last + 1))
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// An Arah guidance store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Whether a career already has rule rows.
  async fn career_has_rules(&self, id: &CareerId) -> Result<bool> {
    let id_str = id.0.clone();
    let exists: bool = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT 1 FROM rules WHERE career_id = ?1 LIMIT 1",
              rusqlite::params![id_str],
              |_| Ok(true),
            )
            .optional()?
            .unwrap_or(false),
        )
      })
      .await?;
    Ok(exists)
  }

  /// Load grouped rule sets, optionally restricted to one career.
  async fn load_rule_sets(
    &self,
    career: Option<CareerId>,
  ) -> Result<Vec<CareerRuleSet>> {
    let filter = career.map(|c| c.0);

    type Row =
      (String, String, Option<f64>, String, String, String, String, String);
    let rows: Vec<Row> = self
      .conn
      .call(move |conn| {
        let base = "SELECT r.career_id, c.name, r.certainty_factor,
                           i.id, i.name, s.id, s.name, s.description
                    FROM rules r
                    JOIN careers   c ON c.id = r.career_id
                    JOIN interests i ON i.id = r.interest_id
                    JOIN skills    s ON s.id = r.skill_id";
        let sql = format!(
          "{base}
           WHERE (?1 IS NULL OR r.career_id = ?1)
           ORDER BY r.career_id, CAST(substr(r.id, 4) AS INTEGER)"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
          .query_map(rusqlite::params![filter], |row| {
            Ok((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
              row.get(5)?,
              row.get(6)?,
              row.get(7)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    // Collapse the fan-out rows back into one set per career, keeping
    // first-seen order and deduplicating interests and skills.
    let mut sets: Vec<CareerRuleSet> = Vec::new();
    for (career_id, career_name, cf, i_id, i_name, s_id, s_name, s_desc) in
      rows
    {
      let career_id = CareerId(career_id);
      if sets.last().map(|s| &s.career_id) != Some(&career_id) {
        sets.push(CareerRuleSet {
          career_id:        career_id.clone(),
          career_name,
          certainty_factor: cf,
          interests:        Vec::new(),
          skills:           Vec::new(),
        });
      }
      let set = sets.last_mut().expect("just pushed");
      let interest = Interest { id: InterestId(i_id), name: i_name };
      if !set.interests.contains(&interest) {
        set.interests.push(interest);
      }
      let skill = Skill {
        id:          SkillId(s_id),
        name:        s_name,
        description: s_desc,
      };
      if !set.skills.contains(&skill) {
        set.skills.push(skill);
      }
    }
    Ok(sets)
  }
}

// ─── GuidanceStore impl ──────────────────────────────────────────────────────

impl GuidanceStore for SqliteStore {
  type Error = Error;

  // ── Interests ─────────────────────────────────────────────────────────────

  async fn add_interest(&self, input: NewInterest) -> Result<Interest> {
    let name = input.name;
    let insert_name = name.clone();
    let id: String = self
      .conn
      .call(move |conn| {
        let id = next_id(conn, "interests", "MIN")?;
        conn.execute(
          "INSERT INTO interests (id, name) VALUES (?1, ?2)",
          rusqlite::params![id, insert_name],
        )?;
        Ok(id)
      })
      .await?;
    Ok(Interest { id: InterestId(id), name })
  }

  async fn get_interest(&self, id: &InterestId) -> Result<Option<Interest>> {
    let id_str = id.0.clone();
    let row: Option<(String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name FROM interests WHERE id = ?1",
              rusqlite::params![id_str],
              |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row.map(|(id, name)| Interest { id: InterestId(id), name }))
  }

  async fn list_interests(&self) -> Result<Vec<Interest>> {
    let rows: Vec<(String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name FROM interests
           ORDER BY CAST(substr(id, 4) AS INTEGER)",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(
      rows
        .into_iter()
        .map(|(id, name)| Interest { id: InterestId(id), name })
        .collect(),
    )
  }

  async fn update_interest(
    &self,
    id: &InterestId,
    input: NewInterest,
  ) -> Result<Interest> {
    let id_str = id.0.clone();
    let name = input.name;
    let update_name = name.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE interests SET name = ?2 WHERE id = ?1",
          rusqlite::params![id_str, update_name],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::InterestNotFound(id.clone()).into());
    }
    Ok(Interest { id: id.clone(), name })
  }

  async fn delete_interest(&self, id: &InterestId) -> Result<()> {
    let id_str = id.0.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM interests WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::InterestNotFound(id.clone()).into());
    }
    Ok(())
  }

  // ── Skills ────────────────────────────────────────────────────────────────

  async fn add_skill(&self, input: NewSkill) -> Result<Skill> {
    let NewSkill { name, description } = input;
    let row = (name.clone(), description.clone());
    let id: String = self
      .conn
      .call(move |conn| {
        let id = next_id(conn, "skills", "KEA")?;
        conn.execute(
          "INSERT INTO skills (id, name, description) VALUES (?1, ?2, ?3)",
          rusqlite::params![id, row.0, row.1],
        )?;
        Ok(id)
      })
      .await?;
    Ok(Skill { id: SkillId(id), name, description })
  }

  async fn get_skill(&self, id: &SkillId) -> Result<Option<Skill>> {
    let id_str = id.0.clone();
    let row: Option<(String, String, String)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, description FROM skills WHERE id = ?1",
              rusqlite::params![id_str],
              |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row.map(|(id, name, description)| Skill {
      id: SkillId(id),
      name,
      description,
    }))
  }

  async fn list_skills(&self) -> Result<Vec<Skill>> {
    let rows: Vec<(String, String, String)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, description FROM skills
           ORDER BY CAST(substr(id, 4) AS INTEGER)",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(
      rows
        .into_iter()
        .map(|(id, name, description)| Skill {
          id: SkillId(id),
          name,
          description,
        })
        .collect(),
    )
  }

  async fn update_skill(&self, id: &SkillId, input: NewSkill) -> Result<Skill> {
    let id_str = id.0.clone();
    let NewSkill { name, description } = input;
    let row = (name.clone(), description.clone());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE skills SET name = ?2, description = ?3 WHERE id = ?1",
          rusqlite::params![id_str, row.0, row.1],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::SkillNotFound(id.clone()).into());
    }
    Ok(Skill { id: id.clone(), name, description })
  }

  async fn delete_skill(&self, id: &SkillId) -> Result<()> {
    let id_str = id.0.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM skills WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::SkillNotFound(id.clone()).into());
    }
    Ok(())
  }

  // ── Careers ───────────────────────────────────────────────────────────────

  async fn add_career(&self, input: NewCareer) -> Result<Career> {
    let NewCareer { name, description, development_notes } = input;
    let row = (name.clone(), description.clone(), development_notes.clone());
    let id: String = self
      .conn
      .call(move |conn| {
        let id = next_id(conn, "careers", "KAR")?;
        conn.execute(
          "INSERT INTO careers (id, name, description, development_notes)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id, row.0, row.1, row.2],
        )?;
        Ok(id)
      })
      .await?;
    Ok(Career { id: CareerId(id), name, description, development_notes })
  }

  async fn get_career(&self, id: &CareerId) -> Result<Option<Career>> {
    let id_str = id.0.clone();
    let row: Option<(String, String, String, Option<String>)> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, name, description, development_notes
               FROM careers WHERE id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
              },
            )
            .optional()?,
        )
      })
      .await?;
    Ok(row.map(|(id, name, description, development_notes)| Career {
      id: CareerId(id),
      name,
      description,
      development_notes,
    }))
  }

  async fn list_careers(&self) -> Result<Vec<Career>> {
    let rows: Vec<(String, String, String, Option<String>)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, name, description, development_notes FROM careers
           ORDER BY CAST(substr(id, 4) AS INTEGER)",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(
      rows
        .into_iter()
        .map(|(id, name, description, development_notes)| Career {
          id: CareerId(id),
          name,
          description,
          development_notes,
        })
        .collect(),
    )
  }

  async fn update_career(
    &self,
    id: &CareerId,
    input: NewCareer,
  ) -> Result<Career> {
    let id_str = id.0.clone();
    let NewCareer { name, description, development_notes } = input;
    let row = (name.clone(), description.clone(), development_notes.clone());
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE careers
           SET name = ?2, description = ?3, development_notes = ?4
           WHERE id = ?1",
          rusqlite::params![id_str, row.0, row.1, row.2],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::CareerNotFound(id.clone()).into());
    }
    Ok(Career { id: id.clone(), name, description, development_notes })
  }

  async fn delete_career(&self, id: &CareerId) -> Result<()> {
    let id_str = id.0.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM careers WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::CareerNotFound(id.clone()).into());
    }
    Ok(())
  }

  // ── Rule base ─────────────────────────────────────────────────────────────

  async fn add_rule_set(&self, input: NewRuleSet) -> Result<Vec<Rule>> {
    input.validate()?;
    let NewRuleSet { career_id, interest_ids, skill_ids, certainty_factor } =
      input;

    if self.get_career(&career_id).await?.is_none() {
      return Err(arah_core::Error::CareerNotFound(career_id).into());
    }
    for id in &interest_ids {
      if self.get_interest(id).await?.is_none() {
        return Err(arah_core::Error::InterestNotFound(id.clone()).into());
      }
    }
    for id in &skill_ids {
      if self.get_skill(id).await?.is_none() {
        return Err(arah_core::Error::SkillNotFound(id.clone()).into());
      }
    }
    if self.career_has_rules(&career_id).await? {
      return Err(arah_core::Error::RuleSetExists(career_id).into());
    }

    // Fan out: one row per interest × skill pair, all in one transaction.
    let cid = career_id.0.clone();
    let interests: Vec<String> =
      interest_ids.iter().map(|i| i.0.clone()).collect();
    let skills: Vec<String> = skill_ids.iter().map(|s| s.0.clone()).collect();
    let inserted: Vec<(String, String, String)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut inserted = Vec::with_capacity(interests.len() * skills.len());
        for interest in &interests {
          for skill in &skills {
            let id = next_id(&tx, "rules", "BAS")?;
            tx.execute(
              "INSERT INTO rules
                 (id, career_id, interest_id, skill_id, certainty_factor)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![id, cid, interest, skill, certainty_factor],
            )?;
            inserted.push((id, interest.clone(), skill.clone()));
          }
        }
        tx.commit()?;
        Ok(inserted)
      })
      .await?;

    Ok(
      inserted
        .into_iter()
        .map(|(id, interest, skill)| Rule {
          id: RuleId(id),
          career_id: career_id.clone(),
          interest_id: InterestId(interest),
          skill_id: SkillId(skill),
          certainty_factor,
        })
        .collect(),
    )
  }

  async fn list_rule_sets(&self) -> Result<Vec<CareerRuleSet>> {
    self.load_rule_sets(None).await
  }

  async fn rule_set_for_career(
    &self,
    id: &CareerId,
  ) -> Result<Option<CareerRuleSet>> {
    let mut sets = self.load_rule_sets(Some(id.clone())).await?;
    Ok(sets.pop())
  }

  async fn delete_rule_set(&self, id: &CareerId) -> Result<usize> {
    let id_str = id.0.clone();
    let removed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM rules WHERE career_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    Ok(removed)
  }

  async fn rules_matching(
    &self,
    interests: &BTreeSet<InterestId>,
    skills: &BTreeSet<SkillId>,
  ) -> Result<Vec<Rule>> {
    if interests.is_empty() || skills.is_empty() {
      return Ok(Vec::new());
    }
    let interests: Vec<String> = interests.iter().map(|i| i.0.clone()).collect();
    let skills: Vec<String> = skills.iter().map(|s| s.0.clone()).collect();

    type Row = (String, String, String, String, Option<f64>);
    let rows: Vec<Row> = self
      .conn
      .call(move |conn| {
        let interest_marks = vec!["?"; interests.len()].join(", ");
        let skill_marks = vec!["?"; skills.len()].join(", ");
        let sql = format!(
          "SELECT id, career_id, interest_id, skill_id, certainty_factor
           FROM rules
           WHERE interest_id IN ({interest_marks})
             AND skill_id    IN ({skill_marks})
           ORDER BY CAST(substr(id, 4) AS INTEGER)"
        );
        let mut stmt = conn.prepare(&sql)?;
        let params =
          rusqlite::params_from_iter(interests.iter().chain(skills.iter()));
        let rows = stmt
          .query_map(params, |row| {
            Ok((
              row.get(0)?,
              row.get(1)?,
              row.get(2)?,
              row.get(3)?,
              row.get(4)?,
            ))
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(
      rows
        .into_iter()
        .map(|(id, career_id, interest_id, skill_id, certainty_factor)| {
          Rule {
            id: RuleId(id),
            career_id: CareerId(career_id),
            interest_id: InterestId(interest_id),
            skill_id: SkillId(skill_id),
            certainty_factor,
          }
        })
        .collect(),
    )
  }

  async fn required_skill_counts(&self) -> Result<BTreeMap<CareerId, usize>> {
    let rows: Vec<(String, i64)> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT career_id, COUNT(DISTINCT skill_id)
           FROM rules GROUP BY career_id",
        )?;
        let rows = stmt
          .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    Ok(
      rows
        .into_iter()
        .map(|(id, count)| (CareerId(id), count as usize))
        .collect(),
    )
  }

  // ── Consultations ─────────────────────────────────────────────────────────

  async fn record_consultation(
    &self,
    input: NewConsultation,
  ) -> Result<Consultation> {
    let NewConsultation { user_id, interest_ids, skill_ids, result, consulted_at } =
      input;
    let consulted_at = consulted_at.unwrap_or_else(Utc::now);

    let user_str = user_id.0.clone();
    let interests_json = encode_interest_ids(&interest_ids)?;
    let skills_json = encode_skill_ids(&skill_ids)?;
    let result_json = encode_result(&result)?;
    let at_str = encode_dt(consulted_at);
    let interests: Vec<String> =
      interest_ids.iter().map(|i| i.0.clone()).collect();
    let skills: Vec<String> = skill_ids.iter().map(|s| s.0.clone()).collect();

    // The consultation row and the |interests| × |skills| answer rows
    // commit together or not at all.
    let id: String = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let id = next_id(&tx, "consultations", "KON")?;
        tx.execute(
          "INSERT INTO consultations
             (id, user_id, interest_ids, skill_ids, result, consulted_at)
           VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id,
            user_str,
            interests_json,
            skills_json,
            result_json,
            at_str,
          ],
        )?;
        for interest in &interests {
          for skill in &skills {
            tx.execute(
              "INSERT INTO consultation_answers
                 (consultation_id, user_id, interest_id, skill_id, recorded_at)
               VALUES (?1, ?2, ?3, ?4, ?5)",
              rusqlite::params![id, user_str, interest, skill, at_str],
            )?;
          }
        }
        tx.commit()?;
        Ok(id)
      })
      .await?;

    Ok(Consultation {
      id: ConsultationId(id),
      user_id,
      interest_ids,
      skill_ids,
      result,
      consulted_at,
    })
  }

  async fn get_consultation(
    &self,
    id: &ConsultationId,
  ) -> Result<Option<Consultation>> {
    let id_str = id.0.clone();
    let raw: Option<RawConsultation> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT id, user_id, interest_ids, skill_ids, result, consulted_at
               FROM consultations WHERE id = ?1",
              rusqlite::params![id_str],
              |row| {
                Ok(RawConsultation {
                  id:           row.get(0)?,
                  user_id:      row.get(1)?,
                  interest_ids: row.get(2)?,
                  skill_ids:    row.get(3)?,
                  result:       row.get(4)?,
                  consulted_at: row.get(5)?,
                })
              },
            )
            .optional()?,
        )
      })
      .await?;
    raw.map(RawConsultation::into_consultation).transpose()
  }

  async fn list_consultations(&self) -> Result<Vec<Consultation>> {
    let raws: Vec<RawConsultation> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT id, user_id, interest_ids, skill_ids, result, consulted_at
           FROM consultations
           ORDER BY consulted_at DESC, CAST(substr(id, 4) AS INTEGER) DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawConsultation {
              id:           row.get(0)?,
              user_id:      row.get(1)?,
              interest_ids: row.get(2)?,
              skill_ids:    row.get(3)?,
              result:       row.get(4)?,
              consulted_at: row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws
      .into_iter()
      .map(RawConsultation::into_consultation)
      .collect()
  }

  async fn delete_consultation(&self, id: &ConsultationId) -> Result<()> {
    let id_str = id.0.clone();
    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM consultations WHERE id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await?;
    if changed == 0 {
      return Err(arah_core::Error::ConsultationNotFound(id.clone()).into());
    }
    Ok(())
  }

  // ── Answer history ────────────────────────────────────────────────────────

  async fn answers_for_consultation(
    &self,
    id: &ConsultationId,
  ) -> Result<Vec<AnswerRecord>> {
    let id_str = id.0.clone();
    let raws: Vec<RawAnswer> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT id, consultation_id, user_id, interest_id, skill_id,
                  recorded_at
           FROM consultation_answers
           WHERE consultation_id = ?1
           ORDER BY id",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawAnswer {
              id:              row.get(0)?,
              consultation_id: row.get(1)?,
              user_id:         row.get(2)?,
              interest_id:     row.get(3)?,
              skill_id:        row.get(4)?,
              recorded_at:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAnswer::into_answer).collect()
  }

  async fn answers_for_user(
    &self,
    user_id: &UserId,
    from: Option<DateTime<Utc>>,
    to: Option<DateTime<Utc>>,
  ) -> Result<Vec<AnswerRecord>> {
    let user_str = user_id.0.clone();
    let from_str = from.map(encode_dt);
    let to_str = to.map(encode_dt);

    let raws: Vec<RawAnswer> = self
      .conn
      .call(move |conn| {
        // RFC 3339 strings in UTC compare chronologically.
        let mut stmt = conn.prepare(
          "SELECT id, consultation_id, user_id, interest_id, skill_id,
                  recorded_at
           FROM consultation_answers
           WHERE user_id = ?1
             AND (?2 IS NULL OR recorded_at >= ?2)
             AND (?3 IS NULL OR recorded_at <= ?3)
           ORDER BY recorded_at DESC, id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![user_str, from_str, to_str], |row| {
            Ok(RawAnswer {
              id:              row.get(0)?,
              consultation_id: row.get(1)?,
              user_id:         row.get(2)?,
              interest_id:     row.get(3)?,
              skill_id:        row.get(4)?,
              recorded_at:     row.get(5)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;
    raws.into_iter().map(RawAnswer::into_answer).collect()
  }
}
