use crate::engine::types::Course;
use crate::store::keys;
use crate::store::{Store, StoreError};

impl Store {
    pub fn create_course(&self, course: &Course) -> Result<(), StoreError> {
        let key = keys::course_key(&course.id);
        if self.courses.get(key.as_bytes())?.is_some() {
            return Err(StoreError::Conflict {
                entity: "course".to_string(),
                key: course.id.clone(),
            });
        }
        self.courses
            .insert(key.as_bytes(), Self::serialize(course)?)?;
        Ok(())
    }

    pub fn get_course(&self, course_id: &str) -> Result<Option<Course>, StoreError> {
        match self.courses.get(keys::course_key(course_id).as_bytes())? {
            Some(raw) => Ok(Some(Self::deserialize(&raw)?)),
            None => Ok(None),
        }
    }

    pub fn update_course(&self, course: &Course) -> Result<(), StoreError> {
        let key = keys::course_key(&course.id);
        if self.courses.get(key.as_bytes())?.is_none() {
            return Err(StoreError::NotFound {
                entity: "course".to_string(),
                key: course.id.clone(),
            });
        }
        self.courses
            .insert(key.as_bytes(), Self::serialize(course)?)?;
        Ok(())
    }

    pub fn delete_course(&self, course_id: &str) -> Result<(), StoreError> {
        if self
            .courses
            .remove(keys::course_key(course_id).as_bytes())?
            .is_none()
        {
            return Err(StoreError::NotFound {
                entity: "course".to_string(),
                key: course_id.to_string(),
            });
        }
        Ok(())
    }

    /// Courses newest first. `tenant_id` of `None` lists every tenant
    /// (admin view); `published_only` hides drafts from staff.
    pub fn list_courses(
        &self,
        tenant_id: Option<&str>,
        published_only: bool,
    ) -> Result<Vec<Course>, StoreError> {
        let mut courses = Vec::new();
        for item in self.courses.iter() {
            let (_, value) = item?;
            let course: Course = Self::deserialize(&value)?;
            if tenant_id.map_or(true, |t| course.tenant_id == t)
                && (!published_only || course.is_published)
            {
                courses.push(course);
            }
        }
        courses.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(courses)
    }

    pub fn count_courses(&self) -> Result<u64, StoreError> {
        Ok(self.courses.len() as u64)
    }
}
