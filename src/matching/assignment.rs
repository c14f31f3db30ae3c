/// Who is placed where during a run.
///
/// Keeps the student -> unit mapping and the unit -> members mapping side by side.
/// Both are only changed through [`place`](Self::place), so they never disagree.
#[derive(Debug, Clone)]
pub struct Assignment {
    student_unit: Vec<Option<usize>>,
    unit_members: Vec<Vec<usize>>,
}

impl Assignment {
    pub fn new(student_count: usize, unit_count: usize) -> Self {
        Self {
            student_unit: vec![None; student_count],
            unit_members: vec![Vec::new(); unit_count],
        }
    }

    #[must_use]
    pub fn unit_of(&self, student: usize) -> Option<usize> {
        self.student_unit[student]
    }

    /// Members of `unit` in the order they were accepted
    pub fn members(&self, unit: usize) -> &[usize] {
        &self.unit_members[unit]
    }

    #[must_use]
    pub fn accepted_count(&self, unit: usize) -> usize {
        self.unit_members[unit].len()
    }

    /// Move `student` into `unit`, releasing any previous placement in the same step.
    ///
    /// Returns the unit the student left, if any.
    pub fn place(&mut self, student: usize, unit: usize) -> Option<usize> {
        let previous = self.student_unit[student].replace(unit);
        if let Some(prev) = previous {
            let members = &mut self.unit_members[prev];
            if let Some(pos) = members.iter().position(|&m| m == student) {
                members.remove(pos);
            }
        }
        self.unit_members[unit].push(student);
        previous
    }

    /// Both mappings describe the same placement
    #[must_use]
    pub fn is_consistent(&self) -> bool {
        let forward = self
            .student_unit
            .iter()
            .enumerate()
            .all(|(s, unit)| match unit {
                Some(u) => self.unit_members[*u].iter().filter(|&&m| m == s).count() == 1,
                None => self.unit_members.iter().all(|members| !members.contains(&s)),
            });
        let backward = self.unit_members.iter().enumerate().all(|(u, members)| {
            members.iter().all(|&s| self.student_unit[s] == Some(u))
        });
        forward && backward
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_and_move() {
        let mut assignment = Assignment::new(2, 2);
        assert_eq!(assignment.place(0, 0), None);
        assert_eq!(assignment.place(1, 0), None);
        assert_eq!(assignment.members(0), [0, 1]);

        assert_eq!(assignment.place(0, 1), Some(0));
        assert_eq!(assignment.unit_of(0), Some(1));
        assert_eq!(assignment.members(0), [1]);
        assert_eq!(assignment.accepted_count(1), 1);
        assert!(assignment.is_consistent());
    }
}
